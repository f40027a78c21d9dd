//! Inference engine adapters.
//!
//! `ReviewEngine` is the seam between the review pipeline and whatever runs
//! the model; `OllamaEngine` is the only production implementation.

mod ollama;
mod transport;

pub use ollama::OllamaEngine;

use crate::error::CastorError;
use async_trait::async_trait;

/// Adapter over a local inference backend.
#[async_trait]
pub trait ReviewEngine: Send + Sync {
    /// Sends a prompt and returns the raw model output.
    async fn generate_review(&self, prompt: &str) -> Result<String, CastorError>;
}
