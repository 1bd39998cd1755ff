//! Workspace sandbox and argument normalization.
//!
//! Every path a tool touches is resolved against the workspace root and
//! rejected if it escapes it. Containment is checked lexically so paths
//! that do not exist yet (create/append) can still be validated.

use std::path::{Component, Path, PathBuf};

use serde_json::{Map, Value};

use herald_domain::ErrorCode;

/// Lexically resolve `rel` inside `workspace`, without touching the
/// filesystem. Returns `None` when the path escapes the root.
pub fn contained_path(workspace: &Path, rel: &str) -> Option<PathBuf> {
    if rel.is_empty() {
        return Some(workspace.to_path_buf());
    }
    let candidate = Path::new(rel);
    if candidate.is_absolute() {
        // Absolute paths are accepted only when already under the root.
        let stripped = candidate.strip_prefix(workspace).ok()?;
        return contained_path(workspace, &stripped.to_string_lossy());
    }

    let mut resolved = workspace.to_path_buf();
    let mut depth: usize = 0;
    for component in candidate.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                resolved.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Whether `rel` stays inside the workspace.
pub fn sandbox_ok(workspace: &Path, rel: &str) -> bool {
    contained_path(workspace, rel).is_some()
}

/// Resolve a command path argument into a safe absolute path.
///
/// Empty paths are an argument error; escapes are a sandbox violation.
pub fn workspace_path(workspace: &Path, rel: &str) -> Result<PathBuf, ErrorCode> {
    if rel.is_empty() {
        return Err(ErrorCode::ArgMissing("path".to_string()));
    }
    contained_path(workspace, rel).ok_or(ErrorCode::PathOutsideWorkspace)
}

/// Relative form of `path` if it sits under `workspace`.
pub fn relative_inside(workspace: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(workspace)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

/// Trim string arguments: whitespace and one pair of outer quotes.
pub fn normalize_args(args: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in args {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                let bytes = trimmed.as_bytes();
                let stripped = if trimmed.len() >= 2
                    && bytes[0] == bytes[bytes.len() - 1]
                    && (bytes[0] == b'"' || bytes[0] == b'\'')
                {
                    &trimmed[1..trimmed.len() - 1]
                } else {
                    trimmed
                };
                out.insert(key.clone(), Value::String(stripped.to_string()));
            }
            other => {
                out.insert(key.clone(), other.clone());
            }
        }
    }
    out
}
