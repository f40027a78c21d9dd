use castor::db::NewReview;
use castor::error::CastorError;
use castor_schema::JobStatus;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_database_url(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!("castor-{tag}-{}-{}.sqlite", std::process::id(), nanos));
    format!("sqlite:{}", temp_path.display())
}

#[tokio::test]
async fn job_lifecycle_queued_to_completed() {
    let db = castor::db::spawn(&temp_database_url("db-job-complete")).await;

    let job = db.create_job().await.expect("create_job failed");
    assert_eq!(job.job_status().unwrap(), JobStatus::Queued);
    assert!(job.completed_at.is_none());
    assert!(job.review_id.is_none());

    // Fresh queued job can be claimed exactly once.
    assert!(db.claim_job(job.job_id.clone()).await.unwrap());
    assert!(!db.claim_job(job.job_id.clone()).await.unwrap());

    let review = db
        .create_review(NewReview {
            language: "Python".to_string(),
            source_code: "pass".to_string(),
            diff: None,
            file_name: None,
            options: None,
            categories: vec![("General Feedback".to_string(), "ok".to_string())],
        })
        .await
        .unwrap();

    assert!(
        db.complete_job(job.job_id.clone(), review.review_id.clone())
            .await
            .unwrap()
    );

    let stored = db.get_job(job.job_id.clone()).await.unwrap().unwrap();
    assert_eq!(stored.job_status().unwrap(), JobStatus::Completed);
    assert!(stored.completed_at.is_some());
    assert_eq!(stored.review_id.as_deref(), Some(review.review_id.as_str()));

    // Terminal: cancel must conflict, further completion must be a no-op.
    let err = db
        .cancel_job(job.job_id.clone())
        .await
        .expect_err("cancel of completed job must fail");
    assert!(matches!(err, CastorError::JobAlreadyTerminal { .. }), "{err}");
    assert!(!db.complete_job(job.job_id.clone(), review.review_id).await.unwrap());
}

#[tokio::test]
async fn job_lifecycle_error_path() {
    let db = castor::db::spawn(&temp_database_url("db-job-error")).await;

    let job = db.create_job().await.unwrap();

    // fail_job only applies to claimed jobs.
    assert!(!db.fail_job(job.job_id.clone()).await.unwrap());
    assert!(db.claim_job(job.job_id.clone()).await.unwrap());
    assert!(db.fail_job(job.job_id.clone()).await.unwrap());

    let stored = db.get_job(job.job_id.clone()).await.unwrap().unwrap();
    assert_eq!(stored.job_status().unwrap(), JobStatus::Error);
    assert!(stored.completed_at.is_some());

    let err = db.cancel_job(job.job_id).await.expect_err("terminal");
    assert!(matches!(err, CastorError::JobAlreadyTerminal { .. }), "{err}");
}

#[tokio::test]
async fn cancel_wins_over_later_claim() {
    let db = castor::db::spawn(&temp_database_url("db-job-cancel")).await;

    let job = db.create_job().await.unwrap();

    let canceled = db.cancel_job(job.job_id.clone()).await.unwrap();
    assert_eq!(canceled.job_status().unwrap(), JobStatus::Canceled);
    assert!(canceled.completed_at.is_some());

    // The queue entry is not removed; a later claim is a no-op.
    assert!(!db.claim_job(job.job_id.clone()).await.unwrap());

    let stored = db.get_job(job.job_id).await.unwrap().unwrap();
    assert_eq!(stored.job_status().unwrap(), JobStatus::Canceled);
}

#[tokio::test]
async fn cancel_applies_to_in_progress_jobs() {
    let db = castor::db::spawn(&temp_database_url("db-job-cancel-inflight")).await;

    let job = db.create_job().await.unwrap();
    assert!(db.claim_job(job.job_id.clone()).await.unwrap());

    let canceled = db.cancel_job(job.job_id.clone()).await.unwrap();
    assert_eq!(canceled.job_status().unwrap(), JobStatus::Canceled);

    // Completion after an in-flight cancel must not overwrite the terminal state.
    assert!(
        !db.complete_job(job.job_id.clone(), "some-review".to_string())
            .await
            .unwrap()
    );
    let stored = db.get_job(job.job_id).await.unwrap().unwrap();
    assert_eq!(stored.job_status().unwrap(), JobStatus::Canceled);
}

#[tokio::test]
async fn unknown_job_ids_are_distinguished() {
    let db = castor::db::spawn(&temp_database_url("db-job-unknown")).await;

    assert!(db.get_job("nope".to_string()).await.unwrap().is_none());
    assert!(!db.claim_job("nope".to_string()).await.unwrap());

    let err = db.cancel_job("nope".to_string()).await.expect_err("missing");
    assert!(matches!(err, CastorError::JobNotFound(_)), "{err}");
}
