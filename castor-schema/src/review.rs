use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input payload for `POST /review` and `POST /jobs`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewRequest {
    /// Programming language of the source code.
    pub language: String,

    /// Full source code text.
    #[serde(rename = "sourceCode")]
    pub source_code: String,

    #[serde(rename = "fileName")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,

    /// Additional review options, stored verbatim alongside the review.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

/// A single named bucket of review feedback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReviewResponseCategory {
    pub category: String,
    pub message: String,
}

/// Output payload for `POST /review`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewResponse {
    #[serde(rename = "reviewId")]
    pub review_id: String,
    pub reviews: Vec<ReviewResponseCategory>,
}

/// User feedback for a single category.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedbackItem {
    pub category: String,
    /// User verdict, e.g. "Good" or "Bad".
    pub feedback: String,
}

/// Input payload for `POST /review/feedback`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewFeedbackRequest {
    #[serde(rename = "reviewId")]
    pub review_id: String,
    pub feedbacks: Vec<FeedbackItem>,
}

/// Acknowledgement body for a stored feedback submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedbackAck {
    pub status: String,
    pub message: String,
}

impl FeedbackAck {
    pub fn saved() -> Self {
        Self {
            status: "success".to_string(),
            message: "Feedback saved.".to_string(),
        }
    }
}
