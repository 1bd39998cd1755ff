//! Ollama chat gateway — the opaque text-completion collaborator.
//!
//! Talks to the `/api/generate` endpoint without streaming. The gateway
//! never breaks its caller: transport and decode failures surface as
//! typed [`ChatGatewayError`] values.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use herald_application::ports::chat_gateway::{ChatGateway, ChatGatewayError};

#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    response: String,
}

/// Adapter for a local Ollama server.
pub struct OllamaGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGateway {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatGateway for OllamaGateway {
    async fn complete(&self, prompt: &str) -> Result<String, ChatGatewayError> {
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|err| ChatGatewayError::Unreachable(err.to_string()))?
            .error_for_status()
            .map_err(|err| ChatGatewayError::Unreachable(err.to_string()))?;

        let body: GenerateBody = response
            .json()
            .await
            .map_err(|err| ChatGatewayError::Malformed(err.to_string()))?;
        debug!(model = %self.model, chars = body.response.len(), "completion received");
        Ok(body.response)
    }
}
