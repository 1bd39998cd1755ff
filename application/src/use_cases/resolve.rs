//! Resolver service — unifies quick rules, the remote backend and the
//! legacy router into one deterministic decision.
//!
//! Resolution precedence, each stage attempted only when the previous did
//! not produce a confident whitelisted command:
//!
//! 1. quick rules (no network, maximal trust)
//! 2. remote backend (with the lexical-hint veto and the low-confidence
//!    legacy re-resolve)
//! 3. legacy router (fixed fallback confidence)
//! 4. chat
//!
//! When a lower-trust stage supplies the command, the confidence of the
//! stage that *triggered* the fallback is kept in the returned metadata so
//! callers can display why the fallback happened.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use herald_domain::rules::hints::{CommandHints, LexicalHints};
use herald_domain::{Intent, legacy_route, resolve_quick};

use crate::config::ResolverConfig;
use crate::ports::resolver_backend::{
    ResolveConstraints, ResolveContext, ResolveRequest, ResolveResponse, ResolverBackend,
    ResolverBackendConfig,
};

/// Confidence attached to a quick-rule hit: syntactically unambiguous.
pub const QUICK_CONFIDENCE: f64 = 0.99;
/// Fixed confidence of the terminal legacy fallback.
pub const FALLBACK_CONFIDENCE: f64 = 0.49;

/// Resolver service; configuration-only, safe for concurrent reuse.
pub struct ResolverService {
    config: ResolverConfig,
    backend: Option<Arc<dyn ResolverBackend>>,
    hints: Arc<dyn CommandHints>,
}

impl ResolverService {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            backend: None,
            hints: Arc::new(LexicalHints),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn ResolverBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replace the lexical-hint predicate used by the remote veto.
    pub fn with_hints(mut self, hints: Arc<dyn CommandHints>) -> Self {
        self.hints = hints;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve one utterance into an intent. Never fails: infrastructure
    /// errors in any stage degrade to lower-trust stages or chat.
    pub async fn resolve(&self, text: &str, context: &ResolveContext) -> Intent {
        let trace_id = Uuid::new_v4().to_string();

        if let Some(quick) = resolve_quick(text)
            && quick
                .name
                .as_deref()
                .is_some_and(|name| self.config.whitelist.contains(name))
        {
            debug!(rule = ?quick.meta.rule, "quick rule hit");
            return quick
                .with_trace_id(trace_id)
                .with_confidence(QUICK_CONFIDENCE);
        }

        let mut remote_chat: Option<Intent> = None;
        if self.config.mode.allows_remote() {
            if let Some(remote) = self.resolve_remote(text, context, &trace_id).await {
                if remote.is_command() {
                    return self.finish_remote_command(text, remote, &trace_id);
                }
                remote_chat = Some(remote);
            }
        }

        // Final fallback: the legacy router works with everything down.
        let legacy = legacy_route(text);
        if legacy.is_command()
            && legacy
                .name
                .as_deref()
                .is_some_and(|name| self.config.whitelist.contains(name))
        {
            debug!("legacy router hit");
            return legacy
                .with_trace_id(trace_id)
                .with_confidence(FALLBACK_CONFIDENCE)
                .with_fallback_used(true);
        }

        if let Some(chat) = remote_chat {
            return chat;
        }
        Intent::chat(text).with_trace_id(trace_id).with_rule("chat")
    }

    /// Post-process a whitelisted remote command: apply the lexical-hint
    /// veto, then the low-confidence legacy re-resolve.
    fn finish_remote_command(&self, text: &str, remote: Intent, trace_id: &str) -> Intent {
        let name = remote.name.clone().unwrap_or_default();

        if !self.hints.looks_like_command(text) {
            warn!(command = %name, "remote command vetoed: no lexical hint in text");
            return Intent::chat(text)
                .with_trace_id(trace_id)
                .with_rule("remote_suspect_command")
                .push_explain(format!("ignored_remote_command:{name}"));
        }

        let Some(confidence) = remote.meta.confidence else {
            return remote;
        };

        if self.config.use_legacy_when_low_conf && confidence < self.config.low_conf_threshold {
            // Keep the remote confidence for audit, but take the legacy
            // router's command and arguments.
            let fallback = legacy_route(text);
            if fallback.is_command()
                && fallback
                    .name
                    .as_deref()
                    .is_some_and(|name| self.config.whitelist.contains(name))
            {
                debug!(confidence, "low remote confidence: re-resolved via legacy router");
                return fallback
                    .with_trace_id(trace_id)
                    .with_confidence(confidence)
                    .with_fallback_used(true);
            }
        }
        remote
    }

    /// One bounded backend call, converted into an intent.
    ///
    /// Errors never cross this boundary: the pipeline must survive the
    /// backend being completely unavailable.
    async fn resolve_remote(
        &self,
        text: &str,
        context: &ResolveContext,
        trace_id: &str,
    ) -> Option<Intent> {
        let backend = self.backend.as_ref()?;
        let request = ResolveRequest {
            trace_id: trace_id.to_string(),
            text: text.to_string(),
            context: context.clone(),
            constraints: ResolveConstraints {
                whitelist: self.config.whitelist.names().to_vec(),
            },
            config: ResolverBackendConfig {
                mode: self.config.mode,
                llm_threshold: self.config.llm_threshold,
                llm: self.config.llm.clone(),
            },
        };

        let response = match backend.resolve(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "resolver backend unavailable");
                return Some(
                    Intent::chat(text)
                        .with_trace_id(trace_id)
                        .with_rule("remote_error")
                        .push_explain(format!("remote_error:{err}")),
                );
            }
        };

        Some(self.intent_from_response(text, response, trace_id))
    }

    fn intent_from_response(
        &self,
        text: &str,
        response: ResolveResponse,
        trace_id: &str,
    ) -> Intent {
        if !response.command.is_empty() && self.config.whitelist.contains(&response.command) {
            let rule = if response.fallback_used {
                "remote_fallback".to_string()
            } else {
                response
                    .resolver_rule
                    .unwrap_or_else(|| "remote".to_string())
            };
            return Intent::command(&response.command)
                .with_args(response.args)
                .with_trace_id(trace_id)
                .with_confidence_opt(response.confidence)
                .with_rule(rule)
                .with_source("remote")
                .with_fallback_used(response.fallback_used)
                .with_explain(response.explain);
        }

        Intent::chat(text)
            .with_trace_id(trace_id)
            .with_rule("remote_unhandled")
            .with_explain(response.explain)
    }
}
