//! Typed configuration file sections.
//!
//! Every section has full defaults so a missing config file yields a
//! working local setup: in-process transport, hybrid resolver without a
//! remote URL, workspace sandbox at `./workspace`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use herald_application::config::{LlmConfig, ResolverConfig, ResolverMode};
use herald_domain::Whitelist;

use crate::tools::RunnerConfig;

/// Which tool transport the executor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Local,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSection {
    pub remote_url: Option<String>,
    pub mode: ResolverMode,
    pub timeout_secs: f64,
    pub low_conf_threshold: f64,
    pub use_legacy_when_low_conf: bool,
    pub llm_threshold: f64,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            remote_url: None,
            mode: ResolverMode::Hybrid,
            timeout_secs: 2.5,
            low_conf_threshold: 0.5,
            use_legacy_when_low_conf: true,
            llm_threshold: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub enable: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: f64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            enable: true,
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "tinyllama".to_string(),
            timeout_secs: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSection {
    pub root: PathBuf,
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("workspace"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSection {
    pub kind: TransportKind,
    pub base_url: String,
    pub timeout_secs: f64,
    pub shared_token: Option<String>,
}

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            kind: TransportKind::Local,
            base_url: "http://127.0.0.1:8011".to_string(),
            timeout_secs: 30.0,
            shared_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSection {
    /// Optional TOML rules file overriding the built-in table.
    pub rules_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub strict_acl: bool,
    pub allow_open: bool,
    pub allow_reveal: bool,
    pub allow_shortcut: bool,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            strict_acl: true,
            allow_open: true,
            allow_reveal: true,
            allow_shortcut: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub max_read_bytes: u64,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_read_bytes: 5_000_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("logs/audit.jsonl"),
        }
    }
}

/// The merged configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub resolver: ResolverSection,
    pub llm: LlmSection,
    pub workspace: WorkspaceSection,
    pub transport: TransportSection,
    pub planner: PlannerSection,
    pub security: SecuritySection,
    pub limits: LimitsSection,
    pub audit: AuditSection,
}

impl FileConfig {
    /// Resolver service configuration derived from this file.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            whitelist: Whitelist::default(),
            remote_url: self.resolver.remote_url.clone(),
            timeout_secs: self.resolver.timeout_secs,
            mode: self.resolver.mode,
            low_conf_threshold: self.resolver.low_conf_threshold,
            use_legacy_when_low_conf: self.resolver.use_legacy_when_low_conf,
            llm_threshold: self.resolver.llm_threshold,
            llm: LlmConfig {
                enable: self.llm.enable,
                base_url: self.llm.base_url.clone(),
                model: self.llm.model.clone(),
            },
        }
    }

    /// Tool runner configuration derived from this file.
    pub fn runner_config(&self, runner_config_path: Option<PathBuf>) -> RunnerConfig {
        RunnerConfig {
            workspace: self.workspace.root.clone(),
            max_read_bytes: self.limits.max_read_bytes,
            allow_open: self.security.allow_open,
            allow_reveal: self.security.allow_reveal,
            allow_shortcut: self.security.allow_shortcut,
            runner_config_path,
        }
    }

    pub fn transport_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.transport.timeout_secs)
    }

    pub fn resolver_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.resolver.timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.llm.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_local() {
        let config = FileConfig::default();
        assert_eq!(config.transport.kind, TransportKind::Local);
        assert!(config.resolver.remote_url.is_none());
        assert!(config.security.strict_acl);
        assert_eq!(config.limits.max_read_bytes, 5_000_000);
    }

    #[test]
    fn test_partial_toml_merges_with_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
[resolver]
remote_url = "http://127.0.0.1:8020"
mode = "remote"

[transport]
kind = "http"
base_url = "http://127.0.0.1:8011"
"#,
        )
        .unwrap();
        assert_eq!(config.resolver.remote_url.as_deref(), Some("http://127.0.0.1:8020"));
        assert_eq!(config.resolver.mode, ResolverMode::Remote);
        assert_eq!(config.transport.kind, TransportKind::Http);
        // Untouched sections keep defaults.
        assert_eq!(config.llm.model, "tinyllama");
        assert!(config.resolver.use_legacy_when_low_conf);
    }

    #[test]
    fn test_resolver_config_conversion() {
        let mut file = FileConfig::default();
        file.resolver.remote_url = Some("http://resolver.local".into());
        file.llm.enable = false;

        let config = file.resolver_config();
        assert_eq!(config.remote_url.as_deref(), Some("http://resolver.local"));
        assert!(!config.llm.enable);
        assert!(config.whitelist.contains("files.list"));
    }
}
