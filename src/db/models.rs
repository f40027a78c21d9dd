use castor_schema::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::CastorError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbReview {
    pub review_id: String,
    pub language: String,
    pub source_code: String,
    pub diff: Option<String>,
    pub file_name: Option<String>,
    /// JSON text, stored verbatim.
    pub options: Option<String>,
    pub created_at: DateTime<Utc>,
    pub model_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbReviewCategory {
    pub id: i64,
    pub review_id: String,
    pub category_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbReviewFeedback {
    pub id: i64,
    pub review_id: String,
    pub category_name: String,
    pub user_feedback: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbReviewJob {
    pub job_id: String,
    /// One of the `JobStatus` names; stored as TEXT.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub review_id: Option<String>,
}

impl DbReviewJob {
    /// Parses the stored status column.
    pub fn job_status(&self) -> Result<JobStatus, CastorError> {
        self.status
            .parse::<JobStatus>()
            .map_err(|e| CastorError::UnexpectedError(format!("corrupt job row: {e}")))
    }
}
