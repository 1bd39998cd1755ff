//! Console formatter for pipeline outcomes.

use colored::Colorize;
use serde_json::json;

use herald_application::PipelineOutcome;
use herald_domain::{ExecutionResult, Intent, Plan};

/// Renders pipeline outcomes for the terminal.
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Human-readable rendering of one outcome.
    pub fn format(outcome: &PipelineOutcome) -> String {
        match outcome {
            PipelineOutcome::Chat { intent } => Self::format_chat(intent),
            PipelineOutcome::PlanningFailed { intent, plan } => {
                Self::format_planning_failure(intent, plan)
            }
            PipelineOutcome::ConfirmationRequired {
                plan,
                required_level,
                ..
            } => Self::format_confirmation(plan, *required_level),
            PipelineOutcome::Executed {
                intent,
                plan,
                execution,
            } => Self::format_executed(intent, plan, execution),
        }
    }

    /// JSON rendering of one outcome, for scripting.
    pub fn format_json(outcome: &PipelineOutcome) -> String {
        let value = match outcome {
            PipelineOutcome::Chat { intent } => json!({"outcome": "chat", "intent": intent}),
            PipelineOutcome::PlanningFailed { intent, plan } => json!({
                "outcome": "planning_failed",
                "intent": intent,
                "error": plan.error.as_ref().map(|e| e.to_string()),
            }),
            PipelineOutcome::ConfirmationRequired {
                intent,
                plan,
                required_level,
            } => json!({
                "outcome": "confirmation_required",
                "intent": intent,
                "plan_id": plan.plan_id,
                "required_level": required_level,
            }),
            PipelineOutcome::Executed {
                intent,
                plan,
                execution,
            } => json!({
                "outcome": "executed",
                "intent": intent,
                "plan_id": plan.plan_id,
                "execution": execution,
            }),
        };
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_chat(intent: &Intent) -> String {
        let text = intent.text.as_deref().unwrap_or_default();
        format!("{} {}", "chat".dimmed(), text)
    }

    /// One-line summary of a resolved command with its provenance.
    pub fn format_intent(intent: &Intent) -> String {
        let name = intent.name.as_deref().unwrap_or("-");
        let args = serde_json::to_string(&intent.args).unwrap_or_default();
        let mut line = format!("{} {}", name.bold(), args.dimmed());
        if let Some(confidence) = intent.meta.confidence {
            line.push_str(&format!(" {}", format!("({confidence:.2})").dimmed()));
        }
        if let Some(source) = &intent.meta.source {
            line.push_str(&format!(" {}", format!("[{source}]").cyan()));
        }
        if intent.meta.fallback_used {
            line.push_str(&format!(" {}", "[fallback]".yellow()));
        }
        line
    }

    fn format_planning_failure(intent: &Intent, plan: &Plan) -> String {
        let code = plan
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "E_INVALID_PLAN".to_string());
        format!(
            "{} {}\n{}",
            "planning failed:".red(),
            code.red().bold(),
            Self::format_intent(intent)
        )
    }

    fn format_confirmation(plan: &Plan, required_level: u8) -> String {
        let tools = plan.required_tools.join(", ");
        format!(
            "{} {} {}\n{} {}",
            "confirmation required".yellow().bold(),
            format!("(level {required_level})").dimmed(),
            format!("for {tools}"),
            "re-run with".dimmed(),
            "--yes".bold()
        )
    }

    fn format_executed(intent: &Intent, _plan: &Plan, execution: &ExecutionResult) -> String {
        let mut lines = vec![Self::format_intent(intent)];
        if execution.ok {
            let result = execution
                .result
                .as_ref()
                .map(Self::render_result)
                .unwrap_or_default();
            lines.push(format!("{} {}", "ok".green().bold(), result));
        } else {
            for error in &execution.errors {
                lines.push(format!("{} {}", "error".red().bold(), error.to_string().red()));
            }
        }
        lines.join("\n")
    }

    fn render_result(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}
