use std::time::Duration;

use async_trait::async_trait;
use common::config::SandboxConfig;
use tracing::debug;

use super::{ExecutionRequest, ExecutionResponse, Sandbox, SandboxError};

/// HTTP client for a Piston-compatible `/execute` endpoint.
#[derive(Clone)]
pub struct PistonSandbox {
    client: reqwest::Client,
    url: String,
    timeout_ms: u64,
}

impl PistonSandbox {
    pub fn new(config: &SandboxConfig) -> Result<Self, SandboxError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| SandboxError::Initialization(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout_ms: config.request_timeout_ms,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> SandboxError {
        if err.is_timeout() {
            SandboxError::Timeout(self.timeout_ms)
        } else {
            SandboxError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl Sandbox for PistonSandbox {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, SandboxError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        debug!(status = status.as_u16(), bytes = body.len(), "Sandbox answered");

        // Rejections come back as non-2xx with a `message` body, which the
        // verifier turns into an internal error.
        serde_json::from_str(&body)
            .map_err(|e| SandboxError::Malformed(format!("HTTP {status}: {e}")))
    }
}
