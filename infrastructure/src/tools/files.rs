//! File tool handlers, sandboxed under the workspace root.

use std::fs;

use serde_json::{Map, Value, json};

use herald_domain::ErrorCode;

use super::RunnerConfig;
use crate::security::{relative_inside, workspace_path};

fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> &'a str {
    args.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

fn io_err(err: std::io::Error) -> ErrorCode {
    ErrorCode::Runtime(err.to_string())
}

/// Recursively list files matching `mask`, as sorted relative paths.
///
/// Masks follow glob syntax: `*.txt`, `notes/*.md`, `**/*.py`.
pub fn list(args: &Map<String, Value>, config: &RunnerConfig) -> Result<Value, ErrorCode> {
    let mask = match str_arg(args, "mask").trim() {
        "" => "*",
        mask => mask,
    };
    let pattern = format!("{}/**/{}", config.workspace.display(), mask);
    let entries = glob::glob(&pattern)
        .map_err(|err| ErrorCode::Runtime(err.to_string()))?;

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .filter_map(|path| relative_inside(&config.workspace, &path))
        .collect();
    names.sort();
    Ok(json!(names))
}

pub fn read(args: &Map<String, Value>, config: &RunnerConfig) -> Result<Value, ErrorCode> {
    let path = workspace_path(&config.workspace, str_arg(args, "path"))?;
    if !path.is_file() {
        return Err(ErrorCode::NotFound);
    }
    let size = fs::metadata(&path).map_err(io_err)?.len();
    if size > config.max_read_bytes {
        return Err(ErrorCode::FileTooLarge);
    }
    let bytes = fs::read(&path).map_err(io_err)?;
    Ok(json!(String::from_utf8_lossy(&bytes).into_owned()))
}

pub fn create(args: &Map<String, Value>, config: &RunnerConfig) -> Result<Value, ErrorCode> {
    let path = workspace_path(&config.workspace, str_arg(args, "path"))?;
    let content = str_arg(args, "content");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&path, content).map_err(io_err)?;
    Ok(json!("OK"))
}

pub fn append(args: &Map<String, Value>, config: &RunnerConfig) -> Result<Value, ErrorCode> {
    use std::io::Write;

    let path = workspace_path(&config.workspace, str_arg(args, "path"))?;
    let content = str_arg(args, "content");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    Ok(json!("OK"))
}
