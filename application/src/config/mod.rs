//! Resolver configuration value types.
//!
//! These are plain values threaded into the services at construction time;
//! file discovery and merging live in the infrastructure layer.

use herald_domain::Whitelist;
use serde::{Deserialize, Serialize};

/// Which resolution stages are allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Quick rules only; no network.
    Quick,
    /// Quick rules, then the remote stage, then legacy.
    #[default]
    Hybrid,
    /// Remote-first deployments; quick rules still pre-check.
    Remote,
}

impl ResolverMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverMode::Quick => "quick",
            ResolverMode::Hybrid => "hybrid",
            ResolverMode::Remote => "remote",
        }
    }

    /// Whether the remote stage may be attempted at all.
    pub fn allows_remote(&self) -> bool {
        matches!(self, ResolverMode::Hybrid | ResolverMode::Remote)
    }
}

/// LLM settings forwarded to the disambiguation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub enable: bool,
    pub base_url: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enable: true,
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "tinyllama".to_string(),
        }
    }
}

/// Configuration of the resolver service.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub whitelist: Whitelist,
    pub remote_url: Option<String>,
    /// Remote call timeout in seconds.
    pub timeout_secs: f64,
    pub mode: ResolverMode,
    /// Remote confidence below this triggers the legacy re-resolve.
    pub low_conf_threshold: f64,
    pub use_legacy_when_low_conf: bool,
    pub llm_threshold: f64,
    pub llm: LlmConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            whitelist: Whitelist::default(),
            remote_url: None,
            timeout_secs: 2.5,
            mode: ResolverMode::Hybrid,
            low_conf_threshold: 0.5,
            use_legacy_when_low_conf: true,
            llm_threshold: 0.75,
            llm: LlmConfig::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    pub fn with_mode(mut self, mode: ResolverMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_whitelist(mut self, whitelist: Whitelist) -> Self {
        self.whitelist = whitelist;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.mode, ResolverMode::Hybrid);
        assert!(config.remote_url.is_none());
        assert!(config.use_legacy_when_low_conf);
        assert_eq!(config.low_conf_threshold, 0.5);
    }

    #[test]
    fn test_mode_allows_remote() {
        assert!(!ResolverMode::Quick.allows_remote());
        assert!(ResolverMode::Hybrid.allows_remote());
        assert!(ResolverMode::Remote.allows_remote());
    }

    #[test]
    fn test_mode_serde_lowercase() {
        assert_eq!(serde_json::to_string(&ResolverMode::Hybrid).unwrap(), "\"hybrid\"");
    }
}
