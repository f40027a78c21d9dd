use super::{ReviewEngine, transport};
use crate::config::EngineConfig;
use crate::error::CastorError;
use async_trait::async_trait;
use castor_schema::{OllamaGenerateRequest, OllamaGenerateResponse};
use tokio::process::Command;
use tracing::{debug, warn};

/// Engine adapter for a locally hosted Ollama instance.
///
/// Primary transport is the HTTP API; when that fails and `cli_fallback` is
/// enabled, one attempt goes through the `ollama run` CLI. There is no third
/// strategy.
pub struct OllamaEngine {
    cfg: EngineConfig,
    client: reqwest::Client,
}

impl OllamaEngine {
    pub fn new(cfg: EngineConfig, client: reqwest::Client) -> Self {
        Self { cfg, client }
    }

    async fn generate_http(&self, prompt: &str) -> Result<String, CastorError> {
        let url = self.cfg.base_url.join("api/generate")?;
        let body = OllamaGenerateRequest {
            model: self.cfg.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let resp = transport::post_json_with_retry("ollama", &self.client, &url, &body).await?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            debug!(%status, body = %raw, "Ollama HTTP transport returned an error status");
            return Err(CastorError::EngineFailure(format!(
                "ollama HTTP transport returned {status}"
            )));
        }

        let parsed: OllamaGenerateResponse = resp.json().await?;
        Ok(parsed.response)
    }

    async fn generate_cli(&self, prompt: &str) -> Result<String, CastorError> {
        let output = Command::new("ollama")
            .arg("run")
            .arg(&self.cfg.model)
            .arg(prompt)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(exit = %output.status, stderr = %stderr, "Ollama CLI inference failed");
            return Err(CastorError::EngineFailure(
                "ollama CLI inference failed".to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl ReviewEngine for OllamaEngine {
    async fn generate_review(&self, prompt: &str) -> Result<String, CastorError> {
        match self.generate_http(prompt).await {
            Ok(raw) => Ok(raw),
            Err(http_err) if self.cfg.cli_fallback => {
                warn!(error = %http_err, "Ollama HTTP transport failed; trying CLI fallback");
                self.generate_cli(prompt).await
            }
            Err(http_err) => Err(http_err),
        }
    }
}
