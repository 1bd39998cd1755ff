//! Pipeline use case — resolve → plan → execute under the confirmation
//! gate.
//!
//! The pipeline never raises: every stage reports a typed outcome, and
//! a confirmation-required plan is a distinct non-executed outcome, not an
//! error. Callers re-invoke with an elevated confirmation level to run it.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::info;

use herald_domain::{ExecutionResult, Intent, Plan};

use crate::ports::audit::{AuditEvent, AuditSink, NoopAudit};
use crate::ports::resolver_backend::ResolveContext;
use crate::use_cases::execute::Executor;
use crate::use_cases::plan::Planner;
use crate::use_cases::resolve::ResolverService;

/// Outcome of handling one utterance.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The utterance is conversation; the caller renders a reply.
    Chat { intent: Intent },
    /// Planning failed with a structured, recoverable error.
    PlanningFailed { intent: Intent, plan: Plan },
    /// The plan needs an explicit confirmation level to run.
    ConfirmationRequired {
        intent: Intent,
        plan: Plan,
        required_level: u8,
    },
    /// The plan was executed (successfully or not; see the result).
    Executed {
        intent: Intent,
        plan: Plan,
        execution: ExecutionResult,
    },
}

impl PipelineOutcome {
    pub fn is_ok(&self) -> bool {
        match self {
            PipelineOutcome::Chat { .. } => true,
            PipelineOutcome::Executed { execution, .. } => execution.ok,
            _ => false,
        }
    }

    pub fn intent(&self) -> &Intent {
        match self {
            PipelineOutcome::Chat { intent }
            | PipelineOutcome::PlanningFailed { intent, .. }
            | PipelineOutcome::ConfirmationRequired { intent, .. }
            | PipelineOutcome::Executed { intent, .. } => intent,
        }
    }
}

/// The three-stage pipeline. Holds only configuration and ports; all
/// per-request state lives in the intent/plan/result values.
pub struct Pipeline {
    resolver: ResolverService,
    planner: Planner,
    executor: Executor,
    audit: Arc<dyn AuditSink>,
}

impl Pipeline {
    pub fn new(resolver: ResolverService, planner: Planner, executor: Executor) -> Self {
        Self {
            resolver,
            planner,
            executor,
            audit: Arc::new(NoopAudit),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn resolver(&self) -> &ResolverService {
        &self.resolver
    }

    /// Handle one utterance at the given confirmation level.
    pub async fn handle(
        &self,
        text: &str,
        context: &ResolveContext,
        confirmation_level: u8,
    ) -> PipelineOutcome {
        let intent = self.resolver.resolve(text, context).await;
        self.audit.record(AuditEvent::new(
            "resolve",
            intent.meta.trace_id.clone(),
            serde_json::to_value(&intent).unwrap_or(Value::Null),
        ));

        if !intent.is_command() {
            info!(trace_id = ?intent.meta.trace_id, "resolved to chat");
            return PipelineOutcome::Chat { intent };
        }

        let mut plan_context = Map::new();
        plan_context.insert("cwd".into(), json!(context.cwd));
        plan_context.insert("locale".into(), json!(context.locale));
        let plan = self.planner.plan(&intent, &plan_context);
        self.audit.record(AuditEvent::new(
            "plan",
            intent.meta.trace_id.clone(),
            json!({
                "plan_id": plan.plan_id,
                "valid": plan.is_valid(),
                "error": plan.error.as_ref().map(|e| e.to_string()),
                "required_tools": plan.required_tools,
            }),
        ));

        if !plan.is_valid() {
            return PipelineOutcome::PlanningFailed { intent, plan };
        }

        if plan.requires_confirmation(confirmation_level) {
            info!(
                plan_id = %plan.plan_id,
                required = plan.policy.confirmation_level,
                provided = confirmation_level,
                "confirmation required"
            );
            let required_level = plan.policy.confirmation_level;
            return PipelineOutcome::ConfirmationRequired {
                intent,
                plan,
                required_level,
            };
        }

        let execution = self.executor.execute(&plan).await;
        self.audit.record(AuditEvent::new(
            "execute",
            intent.meta.trace_id.clone(),
            json!({
                "plan_id": plan.plan_id,
                "ok": execution.ok,
                "errors": execution.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            }),
        ));

        PipelineOutcome::Executed {
            intent,
            plan,
            execution,
        }
    }
}
