//! Intent entities — the resolved meaning of one utterance.
//!
//! An [`Intent`] is produced once per request by the resolver and consumed
//! by the planner. It is never mutated after construction; every builder
//! method moves `self`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whether the utterance is conversation or a whitelisted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Chat,
    Command,
}

/// Auxiliary metadata produced by the resolver stage.
///
/// `rule` names the table entry that fired, `source` the stage
/// (`quick`/`remote`/`legacy`/`chat`), and `explain` is the ordered audit
/// trail of decisions taken on the way to this intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub fallback_used: bool,
    #[serde(default)]
    pub explain: Vec<String>,
}

/// Resolver decision fed into the planner.
///
/// Invariant: `kind == Command` implies `name` is non-empty and drawn from
/// the whitelist known to the resolver that built this intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "type")]
    pub kind: IntentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub args: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub meta: ResolverMeta,
}

impl Intent {
    /// Create a command intent for a whitelisted operation.
    pub fn command(name: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::Command,
            name: Some(name.into()),
            args: Map::new(),
            text: None,
            meta: ResolverMeta::default(),
        }
    }

    /// Create a chat intent carrying the original utterance.
    pub fn chat(text: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::Chat,
            name: None,
            args: Map::new(),
            text: Some(text.into()),
            meta: ResolverMeta::default(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    pub fn with_args(mut self, args: Map<String, Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.meta.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.meta.confidence = Some(confidence);
        self
    }

    /// Set confidence only when the resolver stage reported one.
    pub fn with_confidence_opt(mut self, confidence: Option<f64>) -> Self {
        self.meta.confidence = confidence;
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.meta.rule = Some(rule.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.meta.source = Some(source.into());
        self
    }

    pub fn with_fallback_used(mut self, fallback_used: bool) -> Self {
        self.meta.fallback_used = fallback_used;
        self
    }

    pub fn with_explain(mut self, explain: Vec<String>) -> Self {
        self.meta.explain = explain;
        self
    }

    pub fn push_explain(mut self, entry: impl Into<String>) -> Self {
        self.meta.explain.push(entry.into());
        self
    }

    /// A command intent must carry a non-empty name to be executable.
    pub fn is_command(&self) -> bool {
        self.kind == IntentKind::Command && self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Get a string argument.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }
}
