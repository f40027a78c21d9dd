use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use castor::engine::ReviewEngine;
use castor::error::CastorError;
use castor::server::router::{CastorState, castor_router};
use serde_json::Value;
use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

fn temp_database_url(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!("castor-{tag}-{}-{}.sqlite", std::process::id(), nanos));
    format!("sqlite:{}", temp_path.display())
}

/// Engine stub with a configurable delay before answering.
struct SlowEngine {
    delay: Duration,
    raw: &'static str,
}

#[async_trait]
impl ReviewEngine for SlowEngine {
    async fn generate_review(&self, _prompt: &str) -> Result<String, CastorError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.raw.to_string())
    }
}

async fn build_app(tag: &str, engine: Arc<dyn ReviewEngine>) -> Router {
    let db = castor::db::spawn(&temp_database_url(tag)).await;
    let categories = vec!["General Feedback".to_string(), "Security".to_string()];
    let jobs = castor::jobs::spawn(db.clone(), engine.clone(), categories.clone()).await;
    let state = CastorState::new(db, jobs, engine, categories);
    castor_router(state)
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    // Extractor rejections (422) carry plain-text bodies.
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

async fn post_job(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/jobs")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"language": "Python", "sourceCode": "print('hi')"}"#,
                ))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["status"], "queued");
    body["jobId"].as_str().expect("jobId missing").to_string()
}

async fn get_job_status(app: &Router, job_id: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/v1/jobs/{job_id}"))
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    (status, json_body(resp).await)
}

async fn put_job(app: &Router, job_id: &str, body: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/v1/jobs/{job_id}"))
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    (status, json_body(resp).await)
}

/// Polls until the job leaves `queued`/`in_progress` or the budget runs out.
async fn wait_for_terminal(app: &Router, job_id: &str) -> Value {
    for _ in 0..100 {
        let (status, body) = get_job_status(app, job_id).await;
        assert_eq!(status, StatusCode::OK);
        let s = body["status"].as_str().unwrap_or_default().to_string();
        if s != "queued" && s != "in_progress" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("job {job_id} never reached a terminal state");
}

#[tokio::test]
async fn unknown_job_id_is_404() {
    let engine = Arc::new(SlowEngine {
        delay: Duration::ZERO,
        raw: "[]",
    });
    let app = build_app("jobs-404", engine).await;

    let (status, body) = get_job_status(&app, "does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "JOB_NOT_FOUND");

    let (status, body) = put_job(&app, "does-not-exist", r#"{"status":"canceled"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "JOB_NOT_FOUND");
}

#[tokio::test]
async fn job_completes_and_then_rejects_cancel() {
    let engine = Arc::new(SlowEngine {
        delay: Duration::ZERO,
        raw: r#"[{"category": "Security", "message": "Looks fine."}]"#,
    });
    let app = build_app("jobs-complete", engine).await;

    let job_id = post_job(&app).await;
    let body = wait_for_terminal(&app, &job_id).await;

    assert_eq!(body["status"], "completed");
    assert!(body["completedAt"].is_string());
    assert!(body["reviewId"].is_string());
    let reviews = body["reviews"].as_array().expect("completed job carries reviews");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["category"], "Security");

    // Terminal job: cancel conflicts.
    let (status, body) = put_job(&app, &job_id, r#"{"status":"canceled"}"#).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "JOB_TERMINAL");
}

#[tokio::test]
async fn immediate_cancel_prevents_completion() {
    // Slow engine: the cancel lands while the job is queued or in flight.
    let engine = Arc::new(SlowEngine {
        delay: Duration::from_millis(400),
        raw: "[]",
    });
    let app = build_app("jobs-cancel", engine).await;

    let job_id = post_job(&app).await;
    let (status, body) = put_job(&app, &job_id, r#"{"status":"canceled"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "canceled");
    assert!(body["completedAt"].is_string());

    // Give the worker time to drain the stale queue entry, then make sure the
    // terminal state was not overwritten.
    tokio::time::sleep(Duration::from_millis(800)).await;
    let (status, body) = get_job_status(&app, &job_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "canceled");
}

#[tokio::test]
async fn unsupported_updates_and_bad_payloads() {
    let engine = Arc::new(SlowEngine {
        delay: Duration::from_millis(200),
        raw: "[]",
    });
    let app = build_app("jobs-update", engine).await;

    let job_id = post_job(&app).await;

    // Only "canceled" is a supported target status.
    let (status, body) = put_job(&app, &job_id, r#"{"status":"completed"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "UNSUPPORTED_UPDATE");

    // A status outside the lifecycle enum fails validation.
    let (status, _body) = put_job(&app, &job_id, r#"{"status":"paused"}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
