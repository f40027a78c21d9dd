use serde::{Deserialize, Serialize};
use url::Url;

/// Inference engine (Ollama) settings managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Base URL of the local Ollama HTTP API.
    /// TOML: `engine.base_url`. Default: `http://127.0.0.1:11434`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Model name passed to Ollama.
    /// TOML: `engine.model`. Default: `deepseek-r1:70b`.
    #[serde(default = "default_model")]
    pub model: String,

    /// Connect timeout for the upstream HTTP client, seconds.
    /// TOML: `engine.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Total request timeout for a single inference call, seconds.
    /// TOML: `engine.request_timeout_secs`. Default: `600`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Whether to fall back to the `ollama run` CLI when the HTTP transport
    /// fails. One attempt, no further fallback.
    /// TOML: `engine.cli_fallback`. Default: `true`.
    #[serde(default = "default_cli_fallback")]
    pub cli_fallback: bool,

    /// Category names the prompt instructs the model to review against.
    /// TOML: `engine.categories`.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            cli_fallback: default_cli_fallback(),
            categories: default_categories(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("http://127.0.0.1:11434").expect("default ollama base url must parse")
}

fn default_model() -> String {
    "deepseek-r1:70b".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    600
}

fn default_cli_fallback() -> bool {
    true
}

fn default_categories() -> Vec<String> {
    [
        "General Feedback",
        "Security",
        "Performance",
        "Readability",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
