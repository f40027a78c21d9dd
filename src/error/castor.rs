use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CastorError {
    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job {job_id} is already terminal ({status})")]
    JobAlreadyTerminal { job_id: String, status: String },

    #[error("Unsupported job update: {0}")]
    UnsupportedJobUpdate(String),

    #[error("Engine failure: {0}")]
    EngineFailure(String),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for CastorError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            CastorError::ReviewNotFound(_) => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "REVIEW_NOT_FOUND".to_string(),
                    message: "Review not found.".to_string(),
                    details: None,
                },
            ),

            CastorError::JobNotFound(_) => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "JOB_NOT_FOUND".to_string(),
                    message: "Job not found.".to_string(),
                    details: None,
                },
            ),

            CastorError::JobAlreadyTerminal { status, .. } => (
                StatusCode::CONFLICT,
                ApiErrorObject {
                    code: "JOB_TERMINAL".to_string(),
                    message: format!("Job already {status}; status can no longer change."),
                    details: None,
                },
            ),

            CastorError::UnsupportedJobUpdate(_) => (
                StatusCode::BAD_REQUEST,
                ApiErrorObject {
                    code: "UNSUPPORTED_UPDATE".to_string(),
                    message: "Unsupported update request.".to_string(),
                    details: None,
                },
            ),

            CastorError::EngineFailure(_) | CastorError::ReqwestError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorObject {
                    code: "ENGINE_ERROR".to_string(),
                    message: "Failed to perform code review.".to_string(),
                    details: None,
                },
            ),

            CastorError::JsonError(_)
            | CastorError::IoError(_)
            | CastorError::UrlError(_)
            | CastorError::DatabaseError(_)
            | CastorError::RactorError(_)
            | CastorError::UnexpectedError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                },
            ),
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
