pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod jobs;
pub mod review;
pub mod server;

pub use error::CastorError;
pub use engine::{OllamaEngine, ReviewEngine};
