use crate::db::DbHandle;
use crate::engine::ReviewEngine;
use crate::error::CastorError;
use crate::review::service;
use castor_schema::ReviewRequest;
use ractor::{Actor, ActorProcessingErr, ActorRef};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub enum JobWorkerMessage {
    /// Process one queued review job. Messages are handled strictly in
    /// arrival order, one at a time.
    Process {
        job_id: String,
        request: ReviewRequest,
    },
}

/// Handle for submitting jobs to the single background worker.
#[derive(Clone)]
pub struct JobQueueHandle {
    actor: ActorRef<JobWorkerMessage>,
}

impl JobQueueHandle {
    /// Appends a job to the tail of the queue and returns immediately.
    pub fn enqueue(&self, job_id: String, request: ReviewRequest) -> Result<(), CastorError> {
        ractor::cast!(self.actor, JobWorkerMessage::Process { job_id, request })
            .map_err(|e| CastorError::RactorError(format!("JobWorker cast failed: {e}")))
    }
}

struct JobWorkerState {
    db: DbHandle,
    engine: Arc<dyn ReviewEngine>,
    categories: Vec<String>,
}

struct JobWorker;

#[ractor::async_trait]
impl Actor for JobWorker {
    type Msg = JobWorkerMessage;
    type State = JobWorkerState;
    type Arguments = (DbHandle, Arc<dyn ReviewEngine>, Vec<String>);

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        (db, engine, categories): Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!("JobWorker initialized");
        Ok(JobWorkerState {
            db,
            engine,
            categories,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let JobWorkerMessage::Process { job_id, request } = message;

        // A failed job must never take the worker down with it.
        if let Err(e) = process_job(state, &job_id, &request).await {
            error!(job_id = %job_id, error = %e, "Job processing failed unexpectedly");
        }
        Ok(())
    }
}

async fn process_job(
    state: &JobWorkerState,
    job_id: &str,
    request: &ReviewRequest,
) -> Result<(), CastorError> {
    // Claim queued -> in_progress. Zero rows updated means the job was
    // canceled (or never existed) before we got here; dequeue is a no-op.
    if !state.db.claim_job(job_id.to_string()).await? {
        debug!(job_id = %job_id, "Job no longer queued; skipping");
        return Ok(());
    }

    match service::generate_and_save_review(
        &state.db,
        state.engine.as_ref(),
        &state.categories,
        request,
    )
    .await
    {
        Ok(stored) => {
            let applied = state
                .db
                .complete_job(job_id.to_string(), stored.review_id.clone())
                .await?;
            if applied {
                info!(job_id = %job_id, review_id = %stored.review_id, "Job completed");
            } else {
                // Canceled while in flight; the review row stays but the job
                // keeps its terminal status.
                warn!(job_id = %job_id, "Job left in_progress before completion; not overwriting");
            }
        }
        Err(e) => {
            error!(job_id = %job_id, error = %e, "Job failed; marking error");
            let _ = state.db.fail_job(job_id.to_string()).await?;
        }
    }

    Ok(())
}

/// Spawn the single job worker and return a cloneable handle.
pub async fn spawn(
    db: DbHandle,
    engine: Arc<dyn ReviewEngine>,
    categories: Vec<String>,
) -> JobQueueHandle {
    // Unnamed: several instances may coexist in one process (tests).
    let (actor, _jh) = Actor::spawn(None, JobWorker, (db, engine, categories))
        .await
        .expect("failed to spawn JobWorker");

    JobQueueHandle { actor }
}
