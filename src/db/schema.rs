//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `reviews` table (one row per generated review)
/// - `review_categories` table (parsed LLM feedback, batch-inserted per review)
/// - `review_feedback` table (user verdicts per category)
/// - `review_jobs` table (asynchronous job lifecycle rows, never deleted)
/// - `models` table (optional LLM backend metadata)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Reviews (immutable after creation except through child inserts)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS reviews (
    review_id TEXT PRIMARY KEY NOT NULL,
    language TEXT NOT NULL,
    source_code TEXT NOT NULL,
    diff TEXT NULL,
    file_name TEXT NULL,
    options TEXT NULL, -- JSON
    created_at TEXT NOT NULL, -- RFC3339
    model_id TEXT NULL REFERENCES models(model_id)
);

-- ---------------------------------------------------------------------------
-- Review categories (one row per parsed (category, message) pair)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS review_categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    review_id TEXT NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
    category_name TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_review_categories_review_id ON review_categories(review_id);

-- ---------------------------------------------------------------------------
-- Review feedback (user "Good"/"Bad" verdicts)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS review_feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    review_id TEXT NOT NULL REFERENCES reviews(review_id) ON DELETE CASCADE,
    category_name TEXT NOT NULL,
    user_feedback TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_review_feedback_review_id ON review_feedback(review_id);

-- ---------------------------------------------------------------------------
-- Review jobs (status: queued, in_progress, completed, canceled, error)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS review_jobs (
    job_id TEXT PRIMARY KEY NOT NULL,
    status TEXT NOT NULL DEFAULT 'queued',
    created_at TEXT NOT NULL, -- RFC3339
    completed_at TEXT NULL, -- RFC3339
    review_id TEXT NULL REFERENCES reviews(review_id)
);

CREATE INDEX IF NOT EXISTS idx_review_jobs_status ON review_jobs(status);

-- ---------------------------------------------------------------------------
-- Models (LLM backend metadata, no write path populates this yet)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS models (
    model_id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    version TEXT NULL,
    hosted_by TEXT NULL,
    description TEXT NULL,
    created_at TEXT NOT NULL -- RFC3339
);
"#;
