//! In-process tool registry.
//!
//! Dispatches a canonical command name to its handler. Handlers share a
//! uniform signature `(args, config) → Result<Value, ErrorCode>` and are
//! expected to be effect-atomic at the granularity of one call: a handler
//! that returns an error has not partially applied its effect.

pub mod desktop;
pub mod files;
pub mod management;
pub mod system;

use std::path::PathBuf;

use serde_json::{Map, Value};

use herald_domain::ErrorCode;
use herald_domain::tool::names;

pub use management::{InMemoryManagement, ManagementService};

/// Trusted runner configuration shared by all handlers.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Sandbox root; every file operation stays under it.
    pub workspace: PathBuf,
    pub max_read_bytes: u64,
    pub allow_open: bool,
    pub allow_reveal: bool,
    pub allow_shortcut: bool,
    /// Backing file for `system.config_get` / `system.config_set`.
    pub runner_config_path: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("workspace"),
            max_read_bytes: 5_000_000,
            allow_open: true,
            allow_reveal: true,
            allow_shortcut: true,
            runner_config_path: None,
        }
    }
}

impl RunnerConfig {
    pub fn with_workspace(mut self, workspace: impl Into<PathBuf>) -> Self {
        self.workspace = workspace.into();
        self
    }
}

/// Dispatch one call by exact canonical name.
///
/// The name is validated against the closed registry before any handler
/// runs; an unrecognized name is rejected, never executed.
pub fn dispatch(
    tool: &str,
    args: &Map<String, Value>,
    config: &RunnerConfig,
    management: &dyn ManagementService,
) -> Result<Value, ErrorCode> {
    match tool {
        names::FILES_LIST => files::list(args, config),
        names::FILES_READ => files::read(args, config),
        names::FILES_CREATE => files::create(args, config),
        names::FILES_APPEND => files::append(args, config),
        names::FILES_OPEN => desktop::open(args, config),
        names::FILES_REVEAL => desktop::reveal(args, config),
        names::FILES_SHORTCUT => desktop::shortcut_to_desktop(args, config),
        names::SYSTEM_HELP => system::help(args, config),
        names::SYSTEM_CONFIG_GET => system::config_get(args, config),
        names::SYSTEM_CONFIG_SET => system::config_set(args, config),
        names::MANAGEMENT_EXECUTE => management::execute(args, management),
        _ => Err(ErrorCode::UnknownCommand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_rejected() {
        let config = RunnerConfig::default();
        let result = dispatch("shell.exec", &Map::new(), &config, &InMemoryManagement::default());
        assert_eq!(result, Err(ErrorCode::UnknownCommand));
    }
}
