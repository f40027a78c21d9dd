use serde::{Deserialize, Serialize};

/// Request body for Ollama `POST /api/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaGenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// Response body for a non-streaming Ollama `POST /api/generate` call.
///
/// Only the fields the service reads; Ollama sends more (timings, context)
/// which are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaGenerateResponse {
    pub model: Option<String>,
    pub response: String,
    #[serde(default)]
    pub done: bool,
}
