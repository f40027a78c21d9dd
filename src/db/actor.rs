use crate::db::models::{DbReview, DbReviewCategory, DbReviewJob};
use crate::db::schema::SQLITE_INIT;
use crate::db::write::{NewFeedback, NewReview};
use crate::error::CastorError;
use castor_schema::JobStatus;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;
use uuid::Uuid;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Insert a review row plus its category batch (single transaction).
    CreateReview(NewReview, RpcReplyPort<Result<DbReview, CastorError>>),

    /// List the stored categories of a review, insertion order.
    ListCategories(
        String,
        RpcReplyPort<Result<Vec<DbReviewCategory>, CastorError>>,
    ),

    /// Insert user feedback rows; fails with `ReviewNotFound` if the parent
    /// review does not exist.
    InsertFeedback(
        String,
        Vec<NewFeedback>,
        RpcReplyPort<Result<(), CastorError>>,
    ),

    /// Insert a fresh job row in `queued` state.
    CreateJob(RpcReplyPort<Result<DbReviewJob, CastorError>>),

    /// Fetch a job row by id.
    GetJob(String, RpcReplyPort<Result<Option<DbReviewJob>, CastorError>>),

    /// Guarded `queued -> in_progress` transition; false when the job was
    /// canceled (or removed) before the worker got to it.
    ClaimJob(String, RpcReplyPort<Result<bool, CastorError>>),

    /// Guarded `in_progress -> completed` transition, linking the review.
    CompleteJob(String, String, RpcReplyPort<Result<bool, CastorError>>),

    /// Guarded `in_progress -> error` transition.
    FailJob(String, RpcReplyPort<Result<bool, CastorError>>),

    /// Guarded `{queued|in_progress} -> canceled` transition; errors with
    /// `JobNotFound` / `JobAlreadyTerminal` otherwise.
    CancelJob(String, RpcReplyPort<Result<DbReviewJob, CastorError>>),
}

#[derive(Clone)]
pub struct DbHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbHandle {
    pub async fn create_review(&self, new: NewReview) -> Result<DbReview, CastorError> {
        ractor::call!(self.actor, DbActorMessage::CreateReview, new)
            .map_err(|e| CastorError::RactorError(format!("DbActor CreateReview RPC failed: {e}")))?
    }

    pub async fn list_categories(
        &self,
        review_id: String,
    ) -> Result<Vec<DbReviewCategory>, CastorError> {
        ractor::call!(self.actor, DbActorMessage::ListCategories, review_id).map_err(|e| {
            CastorError::RactorError(format!("DbActor ListCategories RPC failed: {e}"))
        })?
    }

    pub async fn insert_feedback(
        &self,
        review_id: String,
        items: Vec<NewFeedback>,
    ) -> Result<(), CastorError> {
        ractor::call!(self.actor, DbActorMessage::InsertFeedback, review_id, items).map_err(
            |e| CastorError::RactorError(format!("DbActor InsertFeedback RPC failed: {e}")),
        )?
    }

    pub async fn create_job(&self) -> Result<DbReviewJob, CastorError> {
        ractor::call!(self.actor, DbActorMessage::CreateJob)
            .map_err(|e| CastorError::RactorError(format!("DbActor CreateJob RPC failed: {e}")))?
    }

    pub async fn get_job(&self, job_id: String) -> Result<Option<DbReviewJob>, CastorError> {
        ractor::call!(self.actor, DbActorMessage::GetJob, job_id)
            .map_err(|e| CastorError::RactorError(format!("DbActor GetJob RPC failed: {e}")))?
    }

    pub async fn claim_job(&self, job_id: String) -> Result<bool, CastorError> {
        ractor::call!(self.actor, DbActorMessage::ClaimJob, job_id)
            .map_err(|e| CastorError::RactorError(format!("DbActor ClaimJob RPC failed: {e}")))?
    }

    pub async fn complete_job(
        &self,
        job_id: String,
        review_id: String,
    ) -> Result<bool, CastorError> {
        ractor::call!(self.actor, DbActorMessage::CompleteJob, job_id, review_id)
            .map_err(|e| CastorError::RactorError(format!("DbActor CompleteJob RPC failed: {e}")))?
    }

    pub async fn fail_job(&self, job_id: String) -> Result<bool, CastorError> {
        ractor::call!(self.actor, DbActorMessage::FailJob, job_id)
            .map_err(|e| CastorError::RactorError(format!("DbActor FailJob RPC failed: {e}")))?
    }

    pub async fn cancel_job(&self, job_id: String) -> Result<DbReviewJob, CastorError> {
        ractor::call!(self.actor, DbActorMessage::CancelJob, job_id)
            .map_err(|e| CastorError::RactorError(format!("DbActor CancelJob RPC failed: {e}")))?
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::CreateReview(new, reply) => {
                let res = self.create_review(&state.pool, new).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListCategories(review_id, reply) => {
                let res = self.list_categories(&state.pool, &review_id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::InsertFeedback(review_id, items, reply) => {
                let res = self.insert_feedback(&state.pool, &review_id, items).await;
                let _ = reply.send(res);
            }
            DbActorMessage::CreateJob(reply) => {
                let res = self.create_job(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetJob(job_id, reply) => {
                let res = self.get_job(&state.pool, &job_id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ClaimJob(job_id, reply) => {
                let res = self.claim_job(&state.pool, &job_id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::CompleteJob(job_id, review_id, reply) => {
                let res = self.complete_job(&state.pool, &job_id, &review_id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::FailJob(job_id, reply) => {
                let res = self.fail_job(&state.pool, &job_id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::CancelJob(job_id, reply) => {
                let res = self.cancel_job(&state.pool, &job_id).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn create_review(
        &self,
        pool: &SqlitePool,
        new: NewReview,
    ) -> Result<DbReview, CastorError> {
        let review_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
        INSERT INTO reviews (
            review_id, language, source_code, diff, file_name, options, created_at, model_id
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, NULL)
        "#,
        )
        .bind(&review_id)
        .bind(&new.language)
        .bind(&new.source_code)
        .bind(&new.diff)
        .bind(&new.file_name)
        .bind(&new.options)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (category_name, message) in &new.categories {
            sqlx::query(
                r#"
            INSERT INTO review_categories (review_id, category_name, message, created_at)
            VALUES (?, ?, ?, ?)
            "#,
            )
            .bind(&review_id)
            .bind(category_name)
            .bind(message)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(DbReview {
            review_id,
            language: new.language,
            source_code: new.source_code,
            diff: new.diff,
            file_name: new.file_name,
            options: new.options,
            created_at: now,
            model_id: None,
        })
    }

    async fn list_categories(
        &self,
        pool: &SqlitePool,
        review_id: &str,
    ) -> Result<Vec<DbReviewCategory>, CastorError> {
        let rows = sqlx::query_as::<_, DbReviewCategory>(
            r#"
        SELECT id, review_id, category_name, message, created_at
        FROM review_categories
        WHERE review_id = ?
        ORDER BY id
        "#,
        )
        .bind(review_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn insert_feedback(
        &self,
        pool: &SqlitePool,
        review_id: &str,
        items: Vec<NewFeedback>,
    ) -> Result<(), CastorError> {
        let exists: Option<String> =
            sqlx::query_scalar("SELECT review_id FROM reviews WHERE review_id = ?")
                .bind(review_id)
                .fetch_optional(pool)
                .await?;

        if exists.is_none() {
            return Err(CastorError::ReviewNotFound(review_id.to_string()));
        }

        let now = Utc::now();
        let mut tx = pool.begin().await?;

        for item in &items {
            sqlx::query(
                r#"
            INSERT INTO review_feedback (review_id, category_name, user_feedback, created_at)
            VALUES (?, ?, ?, ?)
            "#,
            )
            .bind(review_id)
            .bind(&item.category_name)
            .bind(&item.user_feedback)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn create_job(&self, pool: &SqlitePool) -> Result<DbReviewJob, CastorError> {
        let job_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
        INSERT INTO review_jobs (job_id, status, created_at, completed_at, review_id)
        VALUES (?, 'queued', ?, NULL, NULL)
        "#,
        )
        .bind(&job_id)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(DbReviewJob {
            job_id,
            status: JobStatus::Queued.as_str().to_string(),
            created_at: now,
            completed_at: None,
            review_id: None,
        })
    }

    async fn get_job(
        &self,
        pool: &SqlitePool,
        job_id: &str,
    ) -> Result<Option<DbReviewJob>, CastorError> {
        let row = sqlx::query_as::<_, DbReviewJob>(
            r#"
        SELECT job_id, status, created_at, completed_at, review_id
        FROM review_jobs
        WHERE job_id = ?
        "#,
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    async fn claim_job(&self, pool: &SqlitePool, job_id: &str) -> Result<bool, CastorError> {
        let updated = sqlx::query(
            r#"
        UPDATE review_jobs
        SET status = 'in_progress'
        WHERE job_id = ? AND status = 'queued'
        "#,
        )
        .bind(job_id)
        .execute(pool)
        .await?;

        Ok(updated.rows_affected() > 0)
    }

    async fn complete_job(
        &self,
        pool: &SqlitePool,
        job_id: &str,
        review_id: &str,
    ) -> Result<bool, CastorError> {
        let updated = sqlx::query(
            r#"
        UPDATE review_jobs
        SET status = 'completed', completed_at = ?, review_id = ?
        WHERE job_id = ? AND status = 'in_progress'
        "#,
        )
        .bind(Utc::now())
        .bind(review_id)
        .bind(job_id)
        .execute(pool)
        .await?;

        Ok(updated.rows_affected() > 0)
    }

    async fn fail_job(&self, pool: &SqlitePool, job_id: &str) -> Result<bool, CastorError> {
        let updated = sqlx::query(
            r#"
        UPDATE review_jobs
        SET status = 'error', completed_at = ?
        WHERE job_id = ? AND status = 'in_progress'
        "#,
        )
        .bind(Utc::now())
        .bind(job_id)
        .execute(pool)
        .await?;

        Ok(updated.rows_affected() > 0)
    }

    async fn cancel_job(
        &self,
        pool: &SqlitePool,
        job_id: &str,
    ) -> Result<DbReviewJob, CastorError> {
        let updated = sqlx::query(
            r#"
        UPDATE review_jobs
        SET status = 'canceled', completed_at = ?
        WHERE job_id = ? AND status IN ('queued', 'in_progress')
        "#,
        )
        .bind(Utc::now())
        .bind(job_id)
        .execute(pool)
        .await?;

        if updated.rows_affected() == 0 {
            // Missing or already terminal; inspect the row to tell which.
            return match self.get_job(pool, job_id).await? {
                None => Err(CastorError::JobNotFound(job_id.to_string())),
                Some(job) => Err(CastorError::JobAlreadyTerminal {
                    job_id: job.job_id,
                    status: job.status,
                }),
            };
        }

        self.get_job(pool, job_id).await?.ok_or_else(|| {
            CastorError::UnexpectedError(format!("canceled job row vanished: {job_id}"))
        })
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> DbHandle {
    // Unnamed: several instances may coexist in one process (tests).
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .expect("failed to spawn DbActor");

    DbHandle { actor }
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), CastorError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
