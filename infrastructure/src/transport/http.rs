//! HTTP tool transport.
//!
//! Serializes calls into the fixed `{command, args}` envelope and POSTs
//! them to the runner's `/execute` endpoint. HTTP-level failures become
//! `E_HTTP:*`, undecodable bodies `E_BAD_RESPONSE:*`; 4xx/5xx responses
//! carry the runner's `detail` code through when present.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use herald_application::ports::transport::{ToolTransport, TransportResponse};
use herald_domain::ErrorCode;

const TOKEN_HEADER: &str = "X-Herald-Token";

#[derive(Debug, Deserialize)]
struct ExecuteBody {
    #[serde(default = "default_ok")]
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

fn default_ok() -> bool {
    true
}

/// Transport that talks to a remote tool runner.
pub struct HttpToolTransport {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpToolTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Shared-secret header sent with every call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    async fn classify_error_status(response: reqwest::Response) -> ErrorCode {
        // Prefer the runner's structured detail; fall back to raw text.
        let text = response.text().await.unwrap_or_default();
        if let Ok(body) = serde_json::from_str::<Value>(&text)
            && let Some(detail) = body.get("detail").and_then(|v| v.as_str())
        {
            return ErrorCode::parse(detail);
        }
        if text.is_empty() {
            ErrorCode::CommandFailed
        } else {
            ErrorCode::parse(&text)
        }
    }
}

#[async_trait]
impl ToolTransport for HttpToolTransport {
    async fn execute(&self, tool: &str, args: &Map<String, Value>) -> TransportResponse {
        let payload = json!({"command": tool, "args": args});
        let mut request = self
            .client
            .post(format!("{}/execute", self.base_url))
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(tool, error = %err, "tool runner unreachable");
                return TransportResponse::failure(ErrorCode::Http(err.to_string()));
            }
        };

        if response.status().is_client_error() || response.status().is_server_error() {
            let code = Self::classify_error_status(response).await;
            return TransportResponse::failure(code);
        }

        let body: ExecuteBody = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                return TransportResponse::failure(ErrorCode::BadResponse(err.to_string()));
            }
        };

        if body.ok {
            TransportResponse {
                ok: true,
                result: body.result,
                error: None,
            }
        } else {
            let code = body
                .error
                .map(|raw| ErrorCode::parse(&raw))
                .unwrap_or(ErrorCode::CommandFailed);
            TransportResponse::failure(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_runner_is_http_error() {
        // Reserved TEST-NET address: connection fails fast.
        let transport = HttpToolTransport::new("http://192.0.2.1:1", Duration::from_millis(200));
        let response = transport.execute("files.list", &Map::new()).await;
        assert!(!response.ok);
        assert!(matches!(response.error, Some(ErrorCode::Http(_))));
        assert!(response.result.is_none());
    }

    #[test]
    fn test_body_defaults() {
        let body: ExecuteBody = serde_json::from_str(r#"{"result": "OK"}"#).unwrap();
        assert!(body.ok);
        assert_eq!(body.result, Some(json!("OK")));
        assert!(body.error.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let transport =
            HttpToolTransport::new("http://runner.local/", Duration::from_secs(1));
        assert_eq!(transport.base_url, "http://runner.local");
    }
}
