//! Executor — runs a plan's steps against a transport, enforcing ACL.
//!
//! Steps run strictly in order; there is no reordering and no parallel
//! dispatch, because ACL short-circuiting and the fail-fast default depend
//! on strict sequencing. No step past a denied one is ever attempted.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use herald_domain::{ErrorCode, ExecutionEvent, ExecutionResult, Plan, tool_metadata};

use crate::ports::transport::ToolTransport;

/// Executor; configuration-only, safe for concurrent reuse.
pub struct Executor {
    transport: Arc<dyn ToolTransport>,
    strict_acl: bool,
}

impl Executor {
    pub fn new(transport: Arc<dyn ToolTransport>) -> Self {
        Self {
            transport,
            strict_acl: true,
        }
    }

    pub fn with_strict_acl(mut self, strict_acl: bool) -> Self {
        self.strict_acl = strict_acl;
        self
    }

    /// Execute a plan. `ok` is true iff no step recorded an error.
    pub async fn execute(&self, plan: &Plan) -> ExecutionResult {
        if !plan.is_valid() {
            let error = plan.error.clone().unwrap_or(ErrorCode::InvalidPlan);
            let mut provenance = Map::new();
            provenance.insert(
                "executor".into(),
                json!({"reason": error.to_string(), "planner": plan.provenance}),
            );
            return ExecutionResult::rejected(error, provenance);
        }

        let mut events: Vec<ExecutionEvent> = Vec::new();
        let mut errors: Vec<ErrorCode> = Vec::new();
        let mut last_result: Option<Value> = None;

        for step in &plan.steps {
            if self.strict_acl
                && let Some(meta) = tool_metadata(&step.tool)
                && !plan.policy.allows_tag(meta.acl_tag)
            {
                let error = ErrorCode::AclDeny(step.tool.clone());
                warn!(tool = %step.tool, "step denied by ACL policy");
                events.push(ExecutionEvent::failure(&step.step_id, &step.tool, 0.0, error.clone()));
                errors.push(error);
                break;
            }

            let started = Instant::now();
            let response = self.transport.execute(&step.tool, &step.args).await;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            debug!(tool = %step.tool, ok = response.ok, elapsed_ms, "step finished");

            if response.ok {
                last_result = response.result.clone();
                events.push(ExecutionEvent::success(
                    &step.step_id,
                    &step.tool,
                    elapsed_ms,
                    response.result,
                ));
            } else {
                let error = response.error.unwrap_or(ErrorCode::CommandFailed);
                events.push(ExecutionEvent::failure(
                    &step.step_id,
                    &step.tool,
                    elapsed_ms,
                    error.clone(),
                ));
                errors.push(error);
                if !step.continues_on_error() {
                    break;
                }
            }
        }

        let provenance = Self::build_provenance(plan, &events);
        ExecutionResult::new(last_result, events, provenance, errors)
    }

    fn build_provenance(plan: &Plan, events: &[ExecutionEvent]) -> Map<String, Value> {
        let event_summaries: Vec<Value> = events
            .iter()
            .map(|ev| {
                json!({
                    "step_id": ev.step_id,
                    "tool": ev.tool,
                    "ok": ev.ok,
                    "ms": (ev.elapsed_ms * 100.0).round() / 100.0,
                    "error": ev.error.as_ref().map(|e| e.to_string()),
                })
            })
            .collect();

        let mut provenance = Map::new();
        provenance.insert(
            "executor".into(),
            json!({
                "events": event_summaries,
                "policy": {
                    "acl": plan.policy.acl_tags,
                    "confirmation_level": plan.policy.confirmation_level,
                },
            }),
        );
        provenance.insert("planner".into(), Value::Object(plan.provenance.clone()));
        provenance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use herald_domain::{Intent, PlanPolicy, PlanStep};
    use std::sync::Mutex;

    use crate::ports::transport::TransportResponse;

    /// Transport that records calls and answers from a script.
    struct ScriptedTransport {
        calls: Mutex<Vec<String>>,
        responses: Mutex<Vec<TransportResponse>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<TransportResponse>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(responses),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolTransport for ScriptedTransport {
        async fn execute(&self, tool: &str, _args: &Map<String, Value>) -> TransportResponse {
            self.calls.lock().unwrap().push(tool.to_string());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                TransportResponse::success(json!("OK"))
            } else {
                responses.remove(0)
            }
        }
    }

    fn step(id: &str, tool: &str) -> PlanStep {
        PlanStep::new(id, tool, Map::new())
    }

    fn plan_with(steps: Vec<PlanStep>, policy: PlanPolicy) -> Plan {
        Plan::new(
            "plan-test",
            Intent::command(steps.first().map(|s| s.tool.clone()).unwrap_or_default()),
            steps,
            policy,
            Map::new(),
        )
    }

    #[tokio::test]
    async fn test_single_step_success() {
        let transport = Arc::new(ScriptedTransport::new(vec![TransportResponse::success(
            json!(["a.txt", "b.txt"]),
        )]));
        let executor = Executor::new(transport.clone());
        let plan = plan_with(vec![step("s1", "files.list")], PlanPolicy::new(["fs.read"]));

        let result = executor.execute(&plan).await;
        assert!(result.ok);
        assert_eq!(result.result, Some(json!(["a.txt", "b.txt"])));
        assert_eq!(result.events.len(), 1);
        assert!(result.events[0].elapsed_ms >= 0.0);
        assert_eq!(transport.calls(), vec!["files.list"]);
    }

    #[tokio::test]
    async fn test_acl_denial_stops_before_transport() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let executor = Executor::new(transport.clone());
        // Policy grants fs.read only; files.create carries fs.write.
        let plan = plan_with(
            vec![step("s1", "files.create"), step("s2", "files.list")],
            PlanPolicy::new(["fs.read"]),
        );

        let result = executor.execute(&plan).await;
        assert!(!result.ok);
        assert!(result.first_error().unwrap().is_acl_deny());
        assert!(result.errors[0].to_string().starts_with("E_ACL_DENY"));
        // No partial execution past a denied step, and the denied step
        // itself never reached the transport.
        assert_eq!(result.events.len(), 1);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_strict_acl_disabled_lets_step_through() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let executor = Executor::new(transport.clone()).with_strict_acl(false);
        let plan = plan_with(vec![step("s1", "files.create")], PlanPolicy::new(["fs.read"]));

        let result = executor.execute(&plan).await;
        assert!(result.ok);
        assert_eq!(transport.calls(), vec!["files.create"]);
    }

    #[tokio::test]
    async fn test_fail_fast_halts_following_steps() {
        let transport = Arc::new(ScriptedTransport::new(vec![TransportResponse::failure(
            ErrorCode::NotFound,
        )]));
        let executor = Executor::new(transport.clone());
        let plan = plan_with(
            vec![step("s1", "files.read"), step("s2", "files.list")],
            PlanPolicy::new(["fs.read"]),
        );

        let result = executor.execute(&plan).await;
        assert!(!result.ok);
        assert_eq!(result.errors, vec![ErrorCode::NotFound]);
        assert_eq!(result.events.len(), 1);
        assert_eq!(transport.calls(), vec!["files.read"]);
    }

    #[tokio::test]
    async fn test_on_error_continue_keeps_going() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            TransportResponse::failure(ErrorCode::NotFound),
            TransportResponse::success(json!("OK")),
        ]));
        let executor = Executor::new(transport.clone());
        let plan = plan_with(
            vec![
                step("s1", "files.read").with_on_error("continue"),
                step("s2", "files.list"),
            ],
            PlanPolicy::new(["fs.read"]),
        );

        let result = executor.execute(&plan).await;
        // The error was recorded, so the aggregate is still a failure,
        // but both steps ran and the last success provides the result.
        assert!(!result.ok);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.result, Some(json!("OK")));
        assert_eq!(transport.calls(), vec!["files.read", "files.list"]);
    }

    #[tokio::test]
    async fn test_invalid_plan_rejected_without_events() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let executor = Executor::new(transport.clone());
        let plan = Plan::invalid(
            "plan-x",
            Intent::chat("привет"),
            ErrorCode::NotCommand,
            Map::new(),
        );

        let result = executor.execute(&plan).await;
        assert!(!result.ok);
        assert_eq!(result.errors, vec![ErrorCode::NotCommand]);
        assert!(result.events.is_empty());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_provenance_carries_policy_and_events() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let executor = Executor::new(transport);
        let plan = plan_with(
            vec![step("s1", "system.help")],
            PlanPolicy::new(["system"]).with_confirmation_level(0),
        );

        let result = executor.execute(&plan).await;
        let executor_prov = &result.provenance["executor"];
        assert_eq!(executor_prov["policy"]["acl"][0], "system");
        assert_eq!(executor_prov["events"][0]["tool"], "system.help");
    }
}
