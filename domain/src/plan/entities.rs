//! Plan entities — what the planner hands to the executor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::policy::PlanPolicy;
use crate::core::error::ErrorCode;
use crate::intent::Intent;

/// One tool invocation inside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Unique within the owning plan.
    pub step_id: String,
    pub tool: String,
    #[serde(default)]
    pub args: Map<String, Value>,
    /// `Some("continue")` lets execution proceed past a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_error: Option<String>,
}

impl PlanStep {
    pub fn new(step_id: impl Into<String>, tool: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            step_id: step_id.into(),
            tool: tool.into(),
            args,
            on_error: None,
        }
    }

    pub fn with_on_error(mut self, on_error: impl Into<String>) -> Self {
        self.on_error = Some(on_error.into());
        self
    }

    pub fn continues_on_error(&self) -> bool {
        self.on_error.as_deref() == Some("continue")
    }
}

/// Executable plan produced fresh per request, never mutated afterwards.
///
/// Invariant: `is_valid() ⇔ error is None ∧ steps non-empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: String,
    pub intent: Intent,
    pub steps: Vec<PlanStep>,
    pub required_tools: Vec<String>,
    pub policy: PlanPolicy,
    #[serde(default)]
    pub provenance: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl Plan {
    /// A valid plan built from planner rule output.
    pub fn new(
        plan_id: impl Into<String>,
        intent: Intent,
        steps: Vec<PlanStep>,
        policy: PlanPolicy,
        provenance: Map<String, Value>,
    ) -> Self {
        let required_tools = steps.iter().map(|s| s.tool.clone()).collect();
        let error = if steps.is_empty() {
            Some(ErrorCode::EmptyPlan)
        } else {
            None
        };
        Self {
            plan_id: plan_id.into(),
            intent,
            steps,
            required_tools,
            policy,
            provenance,
            error,
        }
    }

    /// An invalid plan carrying a planning-stage error.
    pub fn invalid(
        plan_id: impl Into<String>,
        intent: Intent,
        error: ErrorCode,
        provenance: Map<String, Value>,
    ) -> Self {
        Self {
            plan_id: plan_id.into(),
            intent,
            steps: Vec::new(),
            required_tools: Vec::new(),
            policy: PlanPolicy::default(),
            provenance,
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none() && !self.steps.is_empty()
    }

    pub fn requires_confirmation(&self, provided_level: u8) -> bool {
        self.policy.requires_confirmation(provided_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(id: &str, tool: &str) -> PlanStep {
        let mut args = Map::new();
        args.insert("path".into(), json!("a.txt"));
        PlanStep::new(id, tool, args)
    }

    #[test]
    fn test_valid_plan() {
        let plan = Plan::new(
            "plan-1",
            Intent::command("files.read"),
            vec![step("s1", "files.read")],
            PlanPolicy::new(["fs.read"]),
            Map::new(),
        );
        assert!(plan.is_valid());
        assert_eq!(plan.required_tools, vec!["files.read"]);
    }

    #[test]
    fn test_empty_steps_invalidate_plan() {
        let plan = Plan::new(
            "plan-2",
            Intent::command("files.read"),
            vec![],
            PlanPolicy::default(),
            Map::new(),
        );
        assert!(!plan.is_valid());
        assert_eq!(plan.error, Some(ErrorCode::EmptyPlan));
    }

    #[test]
    fn test_invalid_plan_carries_error() {
        let plan = Plan::invalid(
            "plan-3",
            Intent::chat("привет"),
            ErrorCode::NotCommand,
            Map::new(),
        );
        assert!(!plan.is_valid());
        assert_eq!(plan.error, Some(ErrorCode::NotCommand));
    }

    #[test]
    fn test_step_on_error_continue() {
        let s = step("s1", "files.read").with_on_error("continue");
        assert!(s.continues_on_error());
        assert!(!step("s2", "files.read").continues_on_error());
    }

    #[test]
    fn test_confirmation_delegates_to_policy() {
        let plan = Plan::new(
            "plan-4",
            Intent::command("files.create"),
            vec![step("s1", "files.create")],
            PlanPolicy::new(["fs.write"]).with_confirmation_level(1),
            Map::new(),
        );
        assert!(plan.requires_confirmation(0));
        assert!(!plan.requires_confirmation(1));
    }
}
