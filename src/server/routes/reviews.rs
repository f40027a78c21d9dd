use crate::error::CastorError;
use crate::review::service;
use crate::server::router::CastorState;
use axum::{Json, extract::State};
use castor_schema::{FeedbackAck, ReviewFeedbackRequest, ReviewRequest, ReviewResponse};
use tracing::debug;

/// `POST /review`: synchronous code review. Blocks for the engine call.
pub(super) async fn review_handler(
    State(state): State<CastorState>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, CastorError> {
    debug!(
        language = %body.language,
        file_name = %body.file_name.as_deref().unwrap_or("<none>"),
        source_len = body.source_code.len(),
        "Incoming synchronous review request"
    );

    let stored = service::generate_and_save_review(
        &state.db,
        state.engine.as_ref(),
        &state.categories,
        &body,
    )
    .await?;

    Ok(Json(ReviewResponse {
        review_id: stored.review_id,
        reviews: stored.reviews,
    }))
}

/// `POST /review/feedback`: store user verdicts for an existing review.
pub(super) async fn feedback_handler(
    State(state): State<CastorState>,
    Json(body): Json<ReviewFeedbackRequest>,
) -> Result<Json<FeedbackAck>, CastorError> {
    service::save_feedback(&state.db, &body).await?;
    Ok(Json(FeedbackAck::saved()))
}
