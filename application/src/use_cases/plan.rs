//! Rule-based planner — turns a command intent into an executable plan.
//!
//! Rules are declarative: per command an id, ACL tags, a confirmation
//! level and a step list. A step either reuses the intent's arguments
//! verbatim (`use_intent_args`) or supplies fixed arguments from the rule.
//! The built-in table covers the default whitelist; deployments can
//! override it with a TOML document of the same shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;
use uuid::Uuid;

use herald_domain::tool::{acl, names};
use herald_domain::{ErrorCode, Intent, Plan, PlanPolicy, PlanStep};

/// One step declaration inside a command rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRule {
    #[serde(default)]
    pub id: Option<String>,
    pub tool: String,
    #[serde(default)]
    pub use_intent_args: bool,
    #[serde(default)]
    pub args: Option<Map<String, Value>>,
    #[serde(default)]
    pub on_error: Option<String>,
}

impl StepRule {
    fn intent_args(tool: &str) -> Self {
        Self {
            id: None,
            tool: tool.to_string(),
            use_intent_args: true,
            args: None,
            on_error: None,
        }
    }
}

/// Declarative rule for one whitelisted command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRule {
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub acl: Vec<String>,
    #[serde(default)]
    pub confirmation_level: u8,
    #[serde(default)]
    pub steps: Vec<StepRule>,
}

impl CommandRule {
    fn single_step(rule_id: &str, tool: &str, acl_tag: &str, confirmation_level: u8) -> Self {
        Self {
            rule_id: Some(rule_id.to_string()),
            acl: vec![acl_tag.to_string()],
            confirmation_level,
            steps: vec![StepRule::intent_args(tool)],
        }
    }
}

/// The full rule table, deserializable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerRules {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub commands: BTreeMap<String, CommandRule>,
}

fn default_version() -> u32 {
    1
}

impl Default for PlannerRules {
    /// Built-in table: one single-step rule per whitelisted command.
    /// Write operations require confirmation level 1.
    fn default() -> Self {
        let entries = [
            (names::FILES_LIST, "fs_list", acl::FS_READ, 0),
            (names::FILES_READ, "fs_read", acl::FS_READ, 0),
            (names::FILES_CREATE, "fs_create", acl::FS_WRITE, 1),
            (names::FILES_APPEND, "fs_append", acl::FS_WRITE, 1),
            (names::FILES_OPEN, "fs_open", acl::FS_DESKTOP, 1),
            (names::FILES_REVEAL, "fs_reveal", acl::FS_DESKTOP, 1),
            (names::FILES_SHORTCUT, "fs_shortcut", acl::FS_DESKTOP, 1),
            (names::SYSTEM_HELP, "sys_help", acl::SYSTEM, 0),
            (names::SYSTEM_CONFIG_GET, "sys_config_get", acl::SYSTEM, 0),
            (names::SYSTEM_CONFIG_SET, "sys_config_set", acl::SYSTEM, 1),
            (names::MANAGEMENT_EXECUTE, "mgmt_execute", acl::MANAGEMENT, 1),
        ];
        let commands = entries
            .into_iter()
            .map(|(command, rule_id, tag, level)| {
                (
                    command.to_string(),
                    CommandRule::single_step(rule_id, command, tag, level),
                )
            })
            .collect();
        Self {
            version: 1,
            commands,
        }
    }
}

impl PlannerRules {
    /// Parse a rule table from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn get(&self, command: &str) -> Option<&CommandRule> {
        self.commands.get(command)
    }
}

/// Planner; configuration-only, safe for concurrent reuse.
pub struct Planner {
    rules: PlannerRules,
}

impl Planner {
    pub fn new(rules: PlannerRules) -> Self {
        Self { rules }
    }

    /// Map a resolved intent to a plan.
    ///
    /// Three failure outcomes, all recoverable and distinguishable:
    /// `E_NOT_COMMAND` (chat intent), `E_NO_RULE` (whitelisted but no rule
    /// declared), `E_EMPTY_PLAN` (rule declared zero steps).
    pub fn plan(&self, intent: &Intent, context: &Map<String, Value>) -> Plan {
        let plan_id = format!("plan-{}", Uuid::new_v4());

        if !intent.is_command() {
            let mut provenance = Map::new();
            provenance.insert("planner_rule_id".into(), Value::Null);
            provenance.insert("reason".into(), json!("not_command"));
            return Plan::invalid(plan_id, intent.clone(), ErrorCode::NotCommand, provenance);
        }
        let name = intent.name.as_deref().unwrap_or_default();

        let Some(rule) = self.rules.get(name) else {
            let mut provenance = Map::new();
            provenance.insert("planner_rule_id".into(), Value::Null);
            provenance.insert("reason".into(), json!("missing_rule"));
            provenance.insert("intent".into(), json!(name));
            return Plan::invalid(plan_id, intent.clone(), ErrorCode::NoRule, provenance);
        };

        let policy = PlanPolicy::new(rule.acl.iter().cloned())
            .with_confirmation_level(rule.confirmation_level);

        let mut steps = Vec::new();
        for step_rule in &rule.steps {
            let step_id = step_rule
                .id
                .clone()
                .unwrap_or_else(|| format!("step{}", steps.len() + 1));
            let args = if step_rule.use_intent_args {
                intent.args.clone()
            } else {
                step_rule.args.clone().unwrap_or_default()
            };
            let mut step = PlanStep::new(step_id, &step_rule.tool, args);
            if let Some(on_error) = &step_rule.on_error {
                step = step.with_on_error(on_error.clone());
            }
            steps.push(step);
        }

        let rule_id = rule.rule_id.clone().unwrap_or_else(|| name.to_string());
        debug!(command = name, rule_id = %rule_id, steps = steps.len(), "planned");

        let mut provenance = Map::new();
        provenance.insert("planner_rule_id".into(), json!(rule_id));
        provenance.insert("acl".into(), json!(policy.acl_tags));
        provenance.insert("context".into(), Value::Object(context.clone()));

        Plan::new(plan_id, intent.clone(), steps, policy, provenance)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step_plan_for_create() {
        let planner = Planner::default();
        let intent = Intent::command("files.create")
            .with_arg("path", "demo.txt")
            .with_arg("content", "hi");
        let plan = planner.plan(&intent, &Map::new());

        assert!(plan.is_valid());
        assert_eq!(plan.policy.confirmation_level, 1);
        assert_eq!(plan.policy.acl_tags, vec!["fs.write"]);
        assert_eq!(plan.required_tools, vec!["files.create"]);
        assert_eq!(plan.provenance["planner_rule_id"], "fs_create");
        assert_eq!(plan.steps[0].args["path"], "demo.txt");
    }

    #[test]
    fn test_chat_intent_is_not_command() {
        let planner = Planner::default();
        let plan = planner.plan(&Intent::chat("привет"), &Map::new());
        assert!(!plan.is_valid());
        assert_eq!(plan.error, Some(ErrorCode::NotCommand));
        assert_eq!(plan.provenance["reason"], "not_command");
    }

    #[test]
    fn test_unknown_command_is_no_rule() {
        let planner = Planner::default();
        let plan = planner.plan(&Intent::command("unknown.cmd"), &Map::new());
        assert!(!plan.is_valid());
        assert_eq!(plan.error, Some(ErrorCode::NoRule));
        assert_eq!(plan.provenance["intent"], "unknown.cmd");
    }

    #[test]
    fn test_rule_with_zero_steps_is_empty_plan() {
        let mut rules = PlannerRules::default();
        rules.commands.insert(
            "files.read".to_string(),
            CommandRule {
                rule_id: Some("fs_read".to_string()),
                acl: vec!["fs.read".to_string()],
                confirmation_level: 0,
                steps: vec![],
            },
        );
        let planner = Planner::new(rules);
        let plan = planner.plan(&Intent::command("files.read"), &Map::new());
        assert!(!plan.is_valid());
        assert_eq!(plan.error, Some(ErrorCode::EmptyPlan));
    }

    #[test]
    fn test_plan_structure_is_deterministic() {
        let planner = Planner::default();
        let intent = Intent::command("files.append")
            .with_arg("path", "a.txt")
            .with_arg("content", "x");
        let first = planner.plan(&intent, &Map::new());
        let second = planner.plan(&intent, &Map::new());

        // plan_id differs per call; everything else is identical.
        assert_eq!(first.steps, second.steps);
        assert_eq!(first.policy, second.policy);
        assert_eq!(first.provenance, second.provenance);
        assert_ne!(first.plan_id, second.plan_id);
    }

    #[test]
    fn test_fixed_args_and_on_error_from_toml() {
        let rules = PlannerRules::from_toml_str(
            r#"
version = 2

[commands."files.list"]
rule_id = "fs_list_fixed"
acl = ["fs.read"]
confirmation_level = 0

[[commands."files.list".steps]]
id = "warmup"
tool = "system.help"
on_error = "continue"

[[commands."files.list".steps]]
id = "listing"
tool = "files.list"
use_intent_args = true
"#,
        )
        .unwrap();
        assert_eq!(rules.version, 2);

        let planner = Planner::new(rules);
        let intent = Intent::command("files.list").with_arg("mask", "*.txt");
        let plan = planner.plan(&intent, &Map::new());

        assert!(plan.is_valid());
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].step_id, "warmup");
        assert!(plan.steps[0].continues_on_error());
        assert!(plan.steps[0].args.is_empty());
        assert_eq!(plan.steps[1].args["mask"], "*.txt");
    }

    #[test]
    fn test_default_rules_cover_default_whitelist() {
        let rules = PlannerRules::default();
        for name in herald_domain::Whitelist::default().names() {
            assert!(rules.get(name).is_some(), "no rule for {name}");
        }
    }
}
