//! System tool handlers: help text and runner config access.

use std::fs;

use serde_json::{Map, Value, json};

use herald_domain::ErrorCode;

use super::RunnerConfig;

fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> &'a str {
    args.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

pub fn help(_args: &Map<String, Value>, _config: &RunnerConfig) -> Result<Value, ErrorCode> {
    Ok(json!(
        "команды: файлы/прочитай/создай файл/допиши/открой/покажи/ярлык; \
         конфиг показать; конфиг установить <ключ> <значение>; \
         менеджмент <действие> ключ=значение"
    ))
}

pub fn config_get(_args: &Map<String, Value>, config: &RunnerConfig) -> Result<Value, ErrorCode> {
    let Some(path) = &config.runner_config_path else {
        return Ok(json!("{}"));
    };
    match fs::read_to_string(path) {
        Ok(text) => Ok(json!(text)),
        Err(_) => Ok(json!("{}")),
    }
}

/// Append `key = "value"` to the runner config file.
///
/// Simple append; the file may need manual cleanup if a key is set twice.
pub fn config_set(args: &Map<String, Value>, config: &RunnerConfig) -> Result<Value, ErrorCode> {
    let key = str_arg(args, "key").trim();
    let value = str_arg(args, "value").trim();
    if key.is_empty() {
        return Err(ErrorCode::ArgMissing("key".to_string()));
    }
    let Some(path) = &config.runner_config_path else {
        return Err(ErrorCode::Forbidden);
    };

    let existing = fs::read_to_string(path).unwrap_or_default();
    let updated = format!("{existing}\n{key} = \"{value}\"\n");
    fs::write(path, updated).map_err(|e| ErrorCode::Runtime(e.to_string()))?;
    Ok(json!("OK"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn args(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn test_help_mentions_commands() {
        let text = help(&Map::new(), &RunnerConfig::default()).unwrap();
        assert!(text.as_str().unwrap().contains("конфиг"));
    }

    #[test]
    fn test_config_get_without_backing_file() {
        let value = config_get(&Map::new(), &RunnerConfig::default()).unwrap();
        assert_eq!(value, json!("{}"));
    }

    #[test]
    fn test_config_set_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runner.toml");
        fs::write(&path, "existing = true\n").unwrap();
        let config = RunnerConfig {
            runner_config_path: Some(path.clone()),
            ..RunnerConfig::default()
        };

        config_set(&args(&[("key", "ui.lang"), ("value", "ru")]), &config).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("existing = true"));
        assert!(text.contains("ui.lang = \"ru\""));
    }

    #[test]
    fn test_config_set_requires_key() {
        let result = config_set(&args(&[("value", "ru")]), &RunnerConfig::default());
        assert_eq!(result, Err(ErrorCode::ArgMissing("key".to_string())));
    }
}
