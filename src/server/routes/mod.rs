use crate::server::router::CastorState;
use axum::{
    Router,
    routing::{get, post},
};

pub mod jobs;
pub mod reviews;

/// One API generation worth of routes; mounted under `/v1` and `/v2`.
pub fn api_router() -> Router<CastorState> {
    Router::new()
        .route("/review", post(reviews::review_handler))
        .route("/review/feedback", post(reviews::feedback_handler))
        .route("/jobs", post(jobs::create_job_handler))
        .route(
            "/jobs/{job_id}",
            get(jobs::get_job_handler).put(jobs::update_job_handler),
        )
}
