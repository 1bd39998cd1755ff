//! Tool vocabulary — canonical command names, ACL metadata, whitelist.
//!
//! This module is the single source of truth for the closed set of
//! executable operations. Every resolver stage and every planner rule keys
//! off these exact names; a name outside the table is never executed.

pub mod names {
    pub const FILES_LIST: &str = "files.list";
    pub const FILES_READ: &str = "files.read";
    pub const FILES_CREATE: &str = "files.create";
    pub const FILES_APPEND: &str = "files.append";
    pub const FILES_OPEN: &str = "files.open";
    pub const FILES_REVEAL: &str = "files.reveal";
    pub const FILES_SHORTCUT: &str = "files.shortcut_to_desktop";
    pub const SYSTEM_HELP: &str = "system.help";
    pub const SYSTEM_CONFIG_GET: &str = "system.config_get";
    pub const SYSTEM_CONFIG_SET: &str = "system.config_set";
    pub const MANAGEMENT_EXECUTE: &str = "management.execute";
}

pub mod acl {
    pub const FS_READ: &str = "fs.read";
    pub const FS_WRITE: &str = "fs.write";
    pub const FS_DESKTOP: &str = "fs.desktop";
    pub const SYSTEM: &str = "system";
    pub const MANAGEMENT: &str = "management";
}

use serde::Serialize;

/// Static per-tool classification consulted by the executor's ACL gate.
///
/// This table is trusted configuration owned by the executor side, never
/// user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolMetadata {
    pub name: &'static str,
    pub acl_tag: &'static str,
    pub side_effect: bool,
    pub idempotent: bool,
}

const TOOL_TABLE: &[ToolMetadata] = &[
    ToolMetadata { name: names::FILES_LIST, acl_tag: acl::FS_READ, side_effect: false, idempotent: true },
    ToolMetadata { name: names::FILES_READ, acl_tag: acl::FS_READ, side_effect: false, idempotent: true },
    ToolMetadata { name: names::FILES_CREATE, acl_tag: acl::FS_WRITE, side_effect: true, idempotent: false },
    ToolMetadata { name: names::FILES_APPEND, acl_tag: acl::FS_WRITE, side_effect: true, idempotent: false },
    ToolMetadata { name: names::FILES_OPEN, acl_tag: acl::FS_DESKTOP, side_effect: true, idempotent: false },
    ToolMetadata { name: names::FILES_REVEAL, acl_tag: acl::FS_DESKTOP, side_effect: true, idempotent: false },
    ToolMetadata { name: names::FILES_SHORTCUT, acl_tag: acl::FS_DESKTOP, side_effect: true, idempotent: false },
    ToolMetadata { name: names::SYSTEM_HELP, acl_tag: acl::SYSTEM, side_effect: false, idempotent: true },
    ToolMetadata { name: names::SYSTEM_CONFIG_GET, acl_tag: acl::SYSTEM, side_effect: false, idempotent: true },
    ToolMetadata { name: names::SYSTEM_CONFIG_SET, acl_tag: acl::SYSTEM, side_effect: true, idempotent: false },
    ToolMetadata { name: names::MANAGEMENT_EXECUTE, acl_tag: acl::MANAGEMENT, side_effect: true, idempotent: false },
];

/// Look up the static metadata for a tool, `None` for unknown names.
pub fn tool_metadata(name: &str) -> Option<&'static ToolMetadata> {
    TOOL_TABLE.iter().find(|meta| meta.name == name)
}

/// Whether an operation modifies state (used in resolver responses).
pub fn classify_write(command: &str) -> bool {
    tool_metadata(command).is_some_and(|meta| meta.side_effect)
}

/// Closed set of command names eligible for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    names: Vec<String>,
}

impl Whitelist {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    pub fn contains(&self, command: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(command)).is_ok()
    }

    /// Sorted view, suitable for the resolver request envelope.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Whitelist {
    /// All commands known to the tool table.
    fn default() -> Self {
        Self::new(TOOL_TABLE.iter().map(|meta| meta.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_lookup() {
        let meta = tool_metadata("files.create").unwrap();
        assert_eq!(meta.acl_tag, "fs.write");
        assert!(meta.side_effect);
        assert!(!meta.idempotent);

        assert!(tool_metadata("files.delete").is_none());
    }

    #[test]
    fn test_classify_write() {
        assert!(classify_write("files.create"));
        assert!(classify_write("system.config_set"));
        assert!(!classify_write("files.list"));
        assert!(!classify_write("nonexistent.command"));
    }

    #[test]
    fn test_default_whitelist_covers_tool_table() {
        let whitelist = Whitelist::default();
        assert!(whitelist.contains("files.list"));
        assert!(whitelist.contains("management.execute"));
        assert!(!whitelist.contains("files.delete"));
        assert_eq!(whitelist.len(), 11);
    }

    #[test]
    fn test_whitelist_names_sorted_and_deduped() {
        let whitelist = Whitelist::new(["b.cmd", "a.cmd", "b.cmd"]);
        assert_eq!(whitelist.names(), &["a.cmd".to_string(), "b.cmd".to_string()]);
    }
}
