//! Execution events and the aggregated result.
//!
//! One [`ExecutionEvent`] is appended per attempted step, in execution
//! order. The aggregate [`ExecutionResult`] upholds `ok ⇔ errors empty`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::ErrorCode;

/// Outcome of one attempted plan step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub step_id: String,
    pub tool: String,
    pub ok: bool,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl ExecutionEvent {
    pub fn success(step_id: impl Into<String>, tool: impl Into<String>, elapsed_ms: f64, result: Option<Value>) -> Self {
        Self {
            step_id: step_id.into(),
            tool: tool.into(),
            ok: true,
            elapsed_ms,
            result,
            error: None,
        }
    }

    pub fn failure(step_id: impl Into<String>, tool: impl Into<String>, elapsed_ms: f64, error: ErrorCode) -> Self {
        Self {
            step_id: step_id.into(),
            tool: tool.into(),
            ok: false,
            elapsed_ms,
            result: None,
            error: Some(error),
        }
    }
}

/// Aggregated outcome of executing one plan.
///
/// `result` is the payload of the last successful step — the useful value
/// for the single-step plans that dominate in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    pub events: Vec<ExecutionEvent>,
    #[serde(default)]
    pub provenance: Map<String, Value>,
    #[serde(default)]
    pub errors: Vec<ErrorCode>,
}

impl ExecutionResult {
    pub fn new(
        result: Option<Value>,
        events: Vec<ExecutionEvent>,
        provenance: Map<String, Value>,
        errors: Vec<ErrorCode>,
    ) -> Self {
        Self {
            ok: errors.is_empty(),
            result,
            events,
            provenance,
            errors,
        }
    }

    /// A failure that never reached any step (invalid plan).
    pub fn rejected(error: ErrorCode, provenance: Map<String, Value>) -> Self {
        Self {
            ok: false,
            result: None,
            events: Vec::new(),
            provenance,
            errors: vec![error],
        }
    }

    pub fn first_error(&self) -> Option<&ErrorCode> {
        self.errors.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_iff_no_errors() {
        let result = ExecutionResult::new(
            Some(json!("OK")),
            vec![ExecutionEvent::success("s1", "files.create", 1.2, Some(json!("OK")))],
            Map::new(),
            vec![],
        );
        assert!(result.ok);

        let failed = ExecutionResult::new(
            None,
            vec![ExecutionEvent::failure("s1", "files.read", 0.4, ErrorCode::NotFound)],
            Map::new(),
            vec![ErrorCode::NotFound],
        );
        assert!(!failed.ok);
        assert_eq!(failed.first_error(), Some(&ErrorCode::NotFound));
    }

    #[test]
    fn test_rejected_has_no_events() {
        let result = ExecutionResult::rejected(ErrorCode::InvalidPlan, Map::new());
        assert!(!result.ok);
        assert!(result.events.is_empty());
        assert_eq!(result.errors, vec![ErrorCode::InvalidPlan]);
    }

    #[test]
    fn test_event_serializes_error_code_as_string() {
        let event = ExecutionEvent::failure("s1", "files.open", 0.1, ErrorCode::AclDeny("files.open".into()));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["error"], "E_ACL_DENY:files.open");
    }
}
