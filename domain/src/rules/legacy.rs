//! Legacy pattern router — the terminal deterministic fallback.
//!
//! A second, independent regex table kept for the strict-quoted phrasing
//! the earliest clients used. Always available without network dependency:
//! with every remote stage down the pipeline can still resolve these.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use super::normalize::clean_str;
use super::parse_management_args;
use crate::intent::Intent;
use crate::tool::names;

const RULE: &str = "legacy_router";
const SOURCE: &str = "legacy";

fn build(command: &str, args: &[(&str, &str)]) -> Intent {
    let mut intent = Intent::command(command).with_rule(RULE).with_source(SOURCE);
    for (key, value) in args {
        intent = intent.with_arg(*key, Value::String(clean_str(value)));
    }
    intent
}

type Builder = fn(&Captures<'_>) -> Option<Intent>;

static PATTERNS: LazyLock<Vec<(Regex, Builder)>> = LazyLock::new(|| {
    let table: Vec<(&str, Builder)> = vec![
        (
            r#"(?i)^\s*файлы\s+"([^"]+)"\s*$"#,
            |m| Some(build(names::FILES_LIST, &[("mask", &m[1])])),
        ),
        (
            r#"(?i)^\s*прочитай\s+"([^"]+)"\s*$"#,
            |m| Some(build(names::FILES_READ, &[("path", &m[1])])),
        ),
        (
            r#"(?i)^\s*создай\s+файл\s+"([^"]+)"\s+с\s+содержимым\s+(.+?)\s*$"#,
            |m| Some(build(names::FILES_CREATE, &[("path", &m[1]), ("content", &m[2])])),
        ),
        (
            r#"(?i)^\s*допиши\s+в\s+"([^"]+)"\s+текст\s+(.+?)\s*$"#,
            |m| Some(build(names::FILES_APPEND, &[("path", &m[1]), ("content", &m[2])])),
        ),
        (
            r#"(?i)^\s*открой\s+"([^"]+)"\s*$"#,
            |m| Some(build(names::FILES_OPEN, &[("path", &m[1])])),
        ),
        (
            r#"(?i)^\s*покажи\s+"([^"]+)"\s*$"#,
            |m| Some(build(names::FILES_REVEAL, &[("path", &m[1])])),
        ),
        (
            r#"(?i)^\s*ярлык\s+"([^"]+)"\s*$"#,
            |m| Some(build(names::FILES_SHORTCUT, &[("path", &m[1])])),
        ),
        (r"(?i)^\s*помощь\s*$", |_| Some(build(names::SYSTEM_HELP, &[]))),
        (
            r"(?i)^\s*конфиг\s+показать\s*$",
            |_| Some(build(names::SYSTEM_CONFIG_GET, &[])),
        ),
        (
            r"(?i)^\s*конфиг\s+установить\s+(\S+)\s+(.+?)\s*$",
            |m| Some(build(names::SYSTEM_CONFIG_SET, &[("key", &m[1]), ("value", &m[2])])),
        ),
        (
            r"(?i)^\s*(?:менеджмент|управление)\s+(\S+)(?:\s+(.+?))?\s*$",
            |m| {
                let args = parse_management_args(&m[1], m.get(2).map(|g| g.as_str()))?;
                Some(
                    Intent::command(names::MANAGEMENT_EXECUTE)
                        .with_args(args)
                        .with_rule(RULE)
                        .with_source(SOURCE),
                )
            },
        ),
    ];
    table
        .into_iter()
        .map(|(pattern, builder)| (Regex::new(pattern).unwrap(), builder))
        .collect()
});

/// Route `text` through the legacy table.
///
/// Always returns an intent: a command on a table hit, otherwise a chat
/// intent with a `no_match` explain entry.
pub fn legacy_route(text: &str) -> Intent {
    let stripped = text.trim();
    for (pattern, builder) in PATTERNS.iter() {
        let Some(caps) = pattern.captures(stripped) else {
            continue;
        };
        if let Some(intent) = builder(&caps)
            && intent.is_command()
        {
            return intent;
        }
    }
    Intent::chat(stripped)
        .with_rule(RULE)
        .with_explain(vec!["no_match".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_requires_quoted_mask() {
        let intent = legacy_route("файлы \"*.txt\"");
        assert!(intent.is_command());
        assert_eq!(intent.name.as_deref(), Some("files.list"));
        assert_eq!(intent.get_str("mask"), Some("*.txt"));
        assert_eq!(intent.meta.source.as_deref(), Some("legacy"));

        // Unquoted form belongs to the quick tier, not this one.
        assert!(!legacy_route("файлы *.txt").is_command());
    }

    #[test]
    fn test_create_with_content() {
        let intent = legacy_route("создай файл \"note.txt\" с содержимым привет");
        assert_eq!(intent.name.as_deref(), Some("files.create"));
        assert_eq!(intent.get_str("path"), Some("note.txt"));
        assert_eq!(intent.get_str("content"), Some("привет"));
    }

    #[test]
    fn test_reveal_and_shortcut() {
        assert_eq!(
            legacy_route("покажи \"plan.md\"").name.as_deref(),
            Some("files.reveal")
        );
        assert_eq!(
            legacy_route("ярлык \"plan.md\"").name.as_deref(),
            Some("files.shortcut_to_desktop")
        );
    }

    #[test]
    fn test_management_key_value() {
        let intent = legacy_route("менеджмент start_task task_id=7");
        assert!(intent.is_command());
        assert_eq!(intent.name.as_deref(), Some("management.execute"));
        assert_eq!(intent.get_str("action"), Some("start_task"));
        assert_eq!(intent.get_str("task_id"), Some("7"));
    }

    #[test]
    fn test_management_bare_token_rejected() {
        let intent = legacy_route("менеджмент start_task seven");
        assert!(!intent.is_command());
    }

    #[test]
    fn test_no_match_is_chat_with_explain() {
        let intent = legacy_route("расскажи анекдот");
        assert!(!intent.is_command());
        assert_eq!(intent.meta.explain, vec!["no_match"]);
        assert_eq!(intent.text.as_deref(), Some("расскажи анекдот"));
    }
}
