use crate::db::models::DbReviewJob;
use crate::error::CastorError;
use crate::server::router::CastorState;
use axum::{
    Json,
    extract::{Path, State},
};
use castor_schema::{
    JobCreateResponse, JobStatus, JobStatusResponse, JobUpdateRequest, ReviewRequest,
    ReviewResponseCategory,
};
use tracing::debug;

fn job_payload(
    job: DbReviewJob,
    reviews: Option<Vec<ReviewResponseCategory>>,
) -> Result<JobStatusResponse, CastorError> {
    let status = job.job_status()?;
    Ok(JobStatusResponse {
        job_id: job.job_id,
        status,
        created_at: job.created_at,
        completed_at: job.completed_at,
        review_id: job.review_id,
        reviews,
    })
}

/// `POST /jobs`: persist a queued job row, enqueue it, return immediately.
pub(super) async fn create_job_handler(
    State(state): State<CastorState>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<JobCreateResponse>, CastorError> {
    let job = state.db.create_job().await?;
    state.jobs.enqueue(job.job_id.clone(), body)?;

    debug!(job_id = %job.job_id, "Review job queued");
    Ok(Json(JobCreateResponse {
        message: format!("Job accepted. Check status via GET /v1/jobs/{}", job.job_id),
        job_id: job.job_id,
        status: JobStatus::Queued,
    }))
}

/// `GET /jobs/{job_id}`: job status, with review categories once completed.
pub(super) async fn get_job_handler(
    State(state): State<CastorState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, CastorError> {
    let job = state
        .db
        .get_job(job_id.clone())
        .await?
        .ok_or(CastorError::JobNotFound(job_id))?;

    let reviews = match (job.job_status()?, job.review_id.as_ref()) {
        (JobStatus::Completed, Some(review_id)) => {
            let categories = state.db.list_categories(review_id.clone()).await?;
            Some(
                categories
                    .into_iter()
                    .map(|c| ReviewResponseCategory {
                        category: c.category_name,
                        message: c.message,
                    })
                    .collect(),
            )
        }
        _ => None,
    };

    Ok(Json(job_payload(job, reviews)?))
}

/// `PUT /jobs/{job_id}`: only `{"status":"canceled"}` is supported.
///
/// Cancel is a database-only transition; the in-memory queue entry stays and
/// the worker's claim check turns a later dequeue into a no-op.
pub(super) async fn update_job_handler(
    State(state): State<CastorState>,
    Path(job_id): Path<String>,
    Json(body): Json<JobUpdateRequest>,
) -> Result<Json<JobStatusResponse>, CastorError> {
    if body.status != JobStatus::Canceled {
        return Err(CastorError::UnsupportedJobUpdate(body.status.to_string()));
    }

    let job = state.db.cancel_job(job_id).await?;
    Ok(Json(job_payload(job, None)?))
}
