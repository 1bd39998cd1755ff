//! Desktop integration handlers: open, reveal, shortcut.
//!
//! All three sit behind security feature flags and spawn the platform
//! opener detached; the command result only reports that the spawn was
//! accepted. Platforms without a known opener report `E_UNSUPPORTED_OS`.

use std::path::Path;
use std::process::Command;

use serde_json::{Map, Value, json};

use herald_domain::ErrorCode;

use super::RunnerConfig;
use crate::security::workspace_path;

fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> &'a str {
    args.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

fn spawn_opener(target: &Path) -> Result<(), ErrorCode> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = Command::new("open");
        c.arg(target);
        c
    };
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(target);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut c = Command::new("xdg-open");
        c.arg(target);
        c
    };

    command.spawn().map(|_| ()).map_err(|_| ErrorCode::UnsupportedOs)
}

pub fn open(args: &Map<String, Value>, config: &RunnerConfig) -> Result<Value, ErrorCode> {
    if !config.allow_open {
        return Err(ErrorCode::Forbidden);
    }
    let path = workspace_path(&config.workspace, str_arg(args, "path"))?;
    if !path.is_file() {
        return Err(ErrorCode::NotFound);
    }
    spawn_opener(&path)?;
    Ok(json!("OK"))
}

/// Reveal a file by opening its containing directory.
pub fn reveal(args: &Map<String, Value>, config: &RunnerConfig) -> Result<Value, ErrorCode> {
    if !config.allow_reveal {
        return Err(ErrorCode::Forbidden);
    }
    let path = workspace_path(&config.workspace, str_arg(args, "path"))?;
    if !path.is_file() {
        return Err(ErrorCode::NotFound);
    }
    let parent = path.parent().unwrap_or(&config.workspace);
    spawn_opener(parent)?;
    Ok(json!("OK"))
}

/// Place a shortcut (symlink) to a workspace file on the desktop.
pub fn shortcut_to_desktop(
    args: &Map<String, Value>,
    config: &RunnerConfig,
) -> Result<Value, ErrorCode> {
    if !config.allow_shortcut {
        return Err(ErrorCode::Forbidden);
    }
    let path = workspace_path(&config.workspace, str_arg(args, "path"))?;
    if !path.is_file() {
        return Err(ErrorCode::NotFound);
    }
    let desktop = dirs::desktop_dir().ok_or(ErrorCode::UnsupportedOs)?;
    let link = desktop.join(path.file_name().ok_or(ErrorCode::NotFound)?);

    #[cfg(unix)]
    {
        if link.exists() {
            std::fs::remove_file(&link).map_err(|e| ErrorCode::Runtime(e.to_string()))?;
        }
        std::os::unix::fs::symlink(&path, &link)
            .map_err(|e| ErrorCode::Runtime(e.to_string()))?;
        Ok(json!("OK"))
    }
    #[cfg(not(unix))]
    {
        let _ = link;
        Err(ErrorCode::UnsupportedOs)
    }
}
