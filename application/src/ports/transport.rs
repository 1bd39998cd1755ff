//! Tool transport port.
//!
//! A minimal two-method contract decoupling "what to run" from "how it is
//! run". The HTTP adapter and the in-process adapter must behave
//! identically to the executor: on failure `result` is `None` and `error`
//! is set; a handler never partially applies its effect when reporting an
//! error.

use async_trait::async_trait;
use herald_domain::ErrorCode;
use serde_json::{Map, Value};

/// Structured outcome of one tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub ok: bool,
    pub result: Option<Value>,
    pub error: Option<ErrorCode>,
}

impl TransportResponse {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: ErrorCode) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

/// Port for invoking one tool.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    async fn execute(&self, tool: &str, args: &Map<String, Value>) -> TransportResponse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_has_no_error() {
        let response = TransportResponse::success(json!("OK"));
        assert!(response.ok);
        assert_eq!(response.result, Some(json!("OK")));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_failure_has_no_result() {
        let response = TransportResponse::failure(ErrorCode::UnknownCommand);
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.error, Some(ErrorCode::UnknownCommand));
    }
}
