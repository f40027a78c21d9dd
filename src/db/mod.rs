//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `write.rs`: insert payloads handed to the actor
//! - `actor.rs`: the ractor actor owning the connection pool

pub mod actor;
pub mod models;
pub mod schema;
pub mod write;

pub use models::{DbReview, DbReviewCategory, DbReviewFeedback, DbReviewJob};
pub use schema::SQLITE_INIT;
pub use write::{NewFeedback, NewReview};

pub use actor::{DbHandle, spawn};
