//! Resolver backend port — the disambiguation collaborator.
//!
//! The resolver service talks to its backend through this port. Two
//! adapters exist in the infrastructure layer: an HTTP client for the
//! remote disambiguation service and an in-process backend that runs the
//! same rules+slots+LLM stack locally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{LlmConfig, ResolverMode};

/// Request context forwarded to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveContext {
    pub cwd: String,
    pub locale: String,
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self {
            cwd: "workspace".to_string(),
            locale: "ru-RU".to_string(),
        }
    }
}

/// Whitelist constraint section of the request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConstraints {
    pub whitelist: Vec<String>,
}

/// Config section of the request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverBackendConfig {
    pub mode: ResolverMode,
    pub llm_threshold: f64,
    pub llm: LlmConfig,
}

/// The `/resolve` request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub trace_id: String,
    pub text: String,
    pub context: ResolveContext,
    pub constraints: ResolveConstraints,
    pub config: ResolverBackendConfig,
}

/// The `/resolve` response envelope.
///
/// Contract: a non-empty `command` MUST still be tested against the
/// caller's whitelist by the caller; the backend may enforce its own, but
/// callers must not assume it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveResponse {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub fallback_used: bool,
    #[serde(default)]
    pub explain: Vec<String>,
    #[serde(default)]
    pub write: bool,
    /// Which backend rule produced the decision, when reported.
    #[serde(default)]
    pub resolver_rule: Option<String>,
}

/// Failure modes of a backend call.
///
/// These never propagate past the resolver service; it converts them into
/// a chat intent annotated `remote_error`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("bad response: {0}")]
    BadResponse(String),
}

/// Port for the disambiguation backend.
#[async_trait]
pub trait ResolverBackend: Send + Sync {
    async fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResponse, BackendError>;
}
