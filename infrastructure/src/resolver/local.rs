//! In-process resolver backend.
//!
//! Runs the same disambiguation stack the remote service exposes, locally:
//! normalization and user lexicon, keyword scoring against an intent rule
//! table, slot extraction, fuzzy path correction, optional LLM-assisted
//! disambiguation, and the sandbox guard that downgrades an escaping path
//! to the safe fallback command.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

use herald_application::config::ResolverMode;
use herald_application::ports::chat_gateway::ChatGateway;
use herald_application::ports::resolver_backend::{
    BackendError, ResolveRequest, ResolveResponse, ResolverBackend,
};
use herald_domain::tool::{classify_write, names};
use herald_domain::{extract_slots, normalize};

use super::fuzzy::try_fuzzy_path;
use crate::security::sandbox_ok;

/// Confidence reported for fallback and sandbox-downgraded decisions.
const FALLBACK_CONFIDENCE: f64 = 0.49;
/// Scores are capped below certainty; only quick rules claim more.
const MAX_CONFIDENCE: f64 = 0.99;

static JSON_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// One keyword-scored intent rule.
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub command: String,
    pub keywords: Vec<String>,
    /// Slot names; a trailing `?` marks the slot optional.
    pub slots: Vec<String>,
}

impl IntentRule {
    fn new(command: &str, keywords: &[&str], slots: &[&str]) -> Self {
        Self {
            command: command.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn required_slots(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|s| !s.ends_with('?'))
            .map(|s| s.as_str())
    }
}

/// Options of the local backend.
#[derive(Debug, Clone)]
pub struct LocalResolverOptions {
    pub fallback_command: String,
    /// User phrase aliases applied after normalization.
    pub lexicon: BTreeMap<String, String>,
    pub rules: Vec<IntentRule>,
}

impl Default for LocalResolverOptions {
    fn default() -> Self {
        Self {
            fallback_command: names::FILES_LIST.to_string(),
            lexicon: BTreeMap::new(),
            rules: vec![
                IntentRule::new(
                    names::FILES_CREATE,
                    &["создай", "создать", "новый файл", "create"],
                    &["path", "content?"],
                ),
                IntentRule::new(
                    names::FILES_READ,
                    &["прочитай", "прочитать", "покажи содержимое", "выведи", "read"],
                    &["path"],
                ),
                IntentRule::new(
                    names::FILES_LIST,
                    &["файлы", "список", "покажи", "list"],
                    &["mask?"],
                ),
                IntentRule::new(
                    names::FILES_APPEND,
                    &["допиши", "добавь", "append"],
                    &["path", "content?"],
                ),
                IntentRule::new(
                    names::FILES_OPEN,
                    &["открой", "открыть", "запусти", "open"],
                    &["path"],
                ),
                IntentRule::new(
                    names::FILES_REVEAL,
                    &["проводник", "покажи в проводнике", "reveal"],
                    &["path"],
                ),
                IntentRule::new(names::SYSTEM_HELP, &["помощь", "help"], &[]),
                IntentRule::new(names::SYSTEM_CONFIG_GET, &["конфиг показать"], &[]),
                IntentRule::new(
                    names::SYSTEM_CONFIG_SET,
                    &["конфиг установить"],
                    &["key", "value"],
                ),
            ],
        }
    }
}

struct Scored {
    command: Option<String>,
    score: f64,
    why: Vec<String>,
}

/// Local disambiguation backend; shares the [`ResolverBackend`] port with
/// the HTTP client so deployments can swap one for the other.
pub struct LocalResolverBackend {
    options: LocalResolverOptions,
    llm: Option<Arc<dyn ChatGateway>>,
}

impl LocalResolverBackend {
    pub fn new(options: LocalResolverOptions) -> Self {
        Self { options, llm: None }
    }

    pub fn with_llm(mut self, llm: Arc<dyn ChatGateway>) -> Self {
        self.llm = Some(llm);
        self
    }

    fn apply_lexicon(&self, text: &str) -> String {
        let mut t = text.to_string();
        for (phrase, replacement) in &self.options.lexicon {
            if t.contains(phrase.as_str()) {
                t = t.replace(phrase.as_str(), replacement);
            }
        }
        t
    }

    fn match_intent(&self, text: &str) -> Scored {
        let mut best = Scored {
            command: None,
            score: 0.0,
            why: Vec::new(),
        };
        for rule in &self.options.rules {
            let hits = rule
                .keywords
                .iter()
                .filter(|keyword| text.contains(keyword.as_str()))
                .count();
            let mut score = if hits > 0 { 0.4 } else { 0.0 };
            if hits > 1 {
                score += 0.1;
            }
            if score > best.score {
                best = Scored {
                    command: Some(rule.command.clone()),
                    score,
                    why: vec![format!("keywords:{hits}")],
                };
            }
        }
        best
    }

    fn missing_required_slot(&self, command: Option<&str>, slots: &Map<String, Value>) -> bool {
        let Some(command) = command else {
            return true;
        };
        let Some(rule) = self.options.rules.iter().find(|r| r.command == command) else {
            return false;
        };
        rule.required_slots().any(|name| {
            slots
                .get(name)
                .and_then(|v| v.as_str())
                .is_none_or(|s| s.is_empty())
        })
    }

    async fn disambiguate_with_llm(
        &self,
        text: &str,
        whitelist: &[String],
        scored: &mut Scored,
        slots: &mut Map<String, Value>,
        llm_threshold: f64,
    ) {
        let Some(llm) = &self.llm else {
            return;
        };
        let prompt = format!(
            "Ты парсер команд. Используй только из белого списка:\n{}\n\n\
             Формат ответа — ЧИСТЫЙ JSON:\n\
             {{\"command\": \"<одно значение из whitelist>\", \
             \"args\": {{\"path\": \"...\", \"mask\": \"...\", \"content\": \"...\", \"key\": \"...\", \"value\": \"...\"}}}}\n\n\
             Если слот не нужен — не пиши его. Содержимое для файлов всегда клади в ключ \"content\".\n\
             Текст пользователя: \"{text}\"",
            whitelist.join(", ")
        );

        let reply = match llm.complete(&prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                debug!(error = %err, "llm disambiguation failed");
                scored.why.push("llm:fail".to_string());
                return;
            }
        };

        let Some(span) = JSON_SPAN.find(&reply) else {
            scored.why.push("llm:fail".to_string());
            return;
        };
        let Ok(Value::Object(guess)) = serde_json::from_str::<Value>(span.as_str()) else {
            scored.why.push("llm:fail".to_string());
            return;
        };

        let command = guess.get("command").and_then(|v| v.as_str()).unwrap_or("");
        if !whitelist.iter().any(|name| name == command) {
            scored.why.push("llm:fail".to_string());
            return;
        }

        scored.command = Some(command.to_string());
        if let Some(Value::Object(args)) = guess.get("args") {
            for (key, value) in args {
                slots.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        scored.score = scored.score.max(llm_threshold);
        scored.why.push("llm:disambiguation".to_string());
    }

    /// Assemble the response envelope, applying the sandbox guard.
    fn pack(
        &self,
        trace_id: &str,
        command: String,
        mut args: Map<String, Value>,
        confidence: f64,
        mut explain: Vec<String>,
        workspace: &Path,
        mut fallback_used: bool,
    ) -> ResolveResponse {
        let mut command = command;
        let mut confidence = confidence;

        if let Some(path) = args.get("path").and_then(|v| v.as_str())
            && !sandbox_ok(workspace, path)
        {
            // A path escaping the sandbox forces the safe default command
            // instead of propagating an error.
            let mask = args
                .get("mask")
                .and_then(|v| v.as_str())
                .unwrap_or("*")
                .to_string();
            command = self.options.fallback_command.clone();
            args = Map::new();
            args.insert("mask".into(), Value::String(mask));
            confidence = FALLBACK_CONFIDENCE;
            explain.push("sandbox:violation".to_string());
            fallback_used = true;
        }

        debug!(trace_id, %command, confidence, "local backend decision");
        ResolveResponse {
            write: classify_write(&command),
            command,
            args,
            confidence: Some(confidence),
            fallback_used,
            explain,
            resolver_rule: Some("local_rules".to_string()),
        }
    }
}

#[async_trait]
impl ResolverBackend for LocalResolverBackend {
    async fn resolve(&self, request: &ResolveRequest) -> Result<ResolveResponse, BackendError> {
        let workspace = Path::new(&request.context.cwd);

        let text = self.apply_lexicon(&normalize(&request.text));
        let mut slots = extract_slots(&text);
        let mut scored = self.match_intent(&text);

        if matches!(
            scored.command.as_deref(),
            Some(names::FILES_CREATE) | Some(names::FILES_OPEN) | Some(names::FILES_READ)
        ) && slots.contains_key("path")
        {
            scored.score += 0.15;
            scored.why.push("slot:path".to_string());
        }

        if !slots.is_empty() {
            scored.score += 0.2;
            scored.why.push("slots:yes".to_string());
        }

        if slots.contains_key("path") {
            let allow_new = matches!(
                scored.command.as_deref(),
                Some(names::FILES_CREATE) | Some(names::FILES_APPEND)
            );
            try_fuzzy_path(workspace, &mut slots, allow_new);
            scored.score += 0.15;
            scored.why.push("fuzzy:path".to_string());
        }

        let ambiguous = (0.5..request.config.llm_threshold).contains(&scored.score)
            || self.missing_required_slot(scored.command.as_deref(), &slots);
        if request.config.mode == ResolverMode::Hybrid && request.config.llm.enable && ambiguous {
            self.disambiguate_with_llm(
                &text,
                &request.constraints.whitelist,
                &mut scored,
                &mut slots,
                request.config.llm_threshold,
            )
            .await;
        }

        // The extractor calls trailing content "text"; the tool surface
        // expects "content".
        if matches!(
            scored.command.as_deref(),
            Some(names::FILES_CREATE) | Some(names::FILES_APPEND)
        ) && !slots.contains_key("content")
            && let Some(text_slot) = slots.remove("text")
        {
            slots.insert("content".into(), text_slot);
        }

        let Some(command) = scored.command.clone() else {
            let mut args = Map::new();
            let mask = slots
                .get("mask")
                .and_then(|v| v.as_str())
                .unwrap_or("*")
                .to_string();
            args.insert("mask".into(), Value::String(mask));
            return Ok(self.pack(
                &request.trace_id,
                self.options.fallback_command.clone(),
                args,
                FALLBACK_CONFIDENCE,
                scored.why,
                workspace,
                true,
            ));
        };

        let confidence = scored.score.min(MAX_CONFIDENCE);
        Ok(self.pack(
            &request.trace_id,
            command,
            slots,
            confidence,
            scored.why,
            workspace,
            false,
        ))
    }
}
