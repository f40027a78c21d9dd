use serde::{Deserialize, Serialize};

/// Payload for inserting a review row together with its parsed categories.
/// The whole insert runs in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub language: String,
    pub source_code: String,
    pub diff: Option<String>,
    pub file_name: Option<String>,
    /// JSON text, already serialized by the caller.
    pub options: Option<String>,
    /// (category_name, message) pairs from the response parser.
    pub categories: Vec<(String, String)>,
}

/// Payload for one user feedback row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub category_name: String,
    pub user_feedback: String,
}
