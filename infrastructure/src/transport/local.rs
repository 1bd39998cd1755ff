//! In-process tool transport.
//!
//! Dispatches to the local registry. Business errors keep their `E_*`
//! code; anything else has already been wrapped as `E_RUNTIME:*` by the
//! handlers, so the executor sees the same error shape as with the HTTP
//! transport.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use herald_application::ports::transport::{ToolTransport, TransportResponse};

use crate::security::normalize_args;
use crate::tools::{InMemoryManagement, ManagementService, RunnerConfig, dispatch};

/// Transport backed by the in-process tool registry.
pub struct LocalToolTransport {
    config: RunnerConfig,
    management: Arc<dyn ManagementService>,
}

impl LocalToolTransport {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            management: Arc::new(InMemoryManagement::default()),
        }
    }

    /// Plug in a real management bounded context.
    pub fn with_management(mut self, management: Arc<dyn ManagementService>) -> Self {
        self.management = management;
        self
    }
}

#[async_trait]
impl ToolTransport for LocalToolTransport {
    async fn execute(&self, tool: &str, args: &Map<String, Value>) -> TransportResponse {
        let normalized = normalize_args(args);
        match dispatch(tool, &normalized, &self.config, &*self.management) {
            Ok(result) => TransportResponse::success(result),
            Err(code) => {
                debug!(tool, error = %code, "local tool failed");
                TransportResponse::failure(code)
            }
        }
    }
}
