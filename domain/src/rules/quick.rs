//! Quick rule matcher — zero-cost regex recognizer for common phrasings.
//!
//! Ordered table, first match wins. A hit here is the most trusted signal
//! in the pipeline: the phrasing is unambiguous, so the resolver attaches
//! no confidence penalty.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use super::normalize::clean_str;
use super::parse_management_args;
use crate::intent::Intent;
use crate::tool::names;

const RULE: &str = "quick_ru";
const SOURCE: &str = "quick";

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
            r"(?i)^(?:создай|создать)\s+файл\s+(.+?)\s+с\s+содержимым\s+(.+)$",
            |m| Some(build(names::FILES_CREATE, &[("path", &m[1]), ("content", &m[2])])),
        ),
        (
            r"(?i)^(?:создай|создать)\s+файл\s+(.+)$",
            |m| Some(build(names::FILES_CREATE, &[("path", &m[1]), ("content", "")])),
        ),
        (
            r"(?i)^(?:прочитай|прочитать)\s+файл\s+(.+)$",
            |m| Some(build(names::FILES_READ, &[("path", &m[1])])),
        ),
        (
            r"(?i)^(?:покажи|список|файлы)(?:\s+(.*))?$",
            |m| {
                let mask = m.get(1).map(|g| g.as_str()).unwrap_or("*");
                Some(build(names::FILES_LIST, &[("mask", mask)]))
            },
        ),
        (
            r"(?i)^(?:открой|открыть)\s+файл\s+(.+)$",
            |m| Some(build(names::FILES_OPEN, &[("path", &m[1])])),
        ),
        (
            r"(?i)^(?:допиши|добавь)\s+в\s+файл\s+(.+?)\s*[:\-–]\s*(.+)$",
            |m| Some(build(names::FILES_APPEND, &[("path", &m[1]), ("content", &m[2])])),
        ),
        (r"(?i)^помощь\s*$", |_| Some(build(names::SYSTEM_HELP, &[]))),
        (
            r"(?i)^конфиг\s+показать\s*$",
            |_| Some(build(names::SYSTEM_CONFIG_GET, &[])),
        ),
        (
            r"(?i)^конфиг\s+установить\s+(\S+)\s+(.+)$",
            |m| Some(build(names::SYSTEM_CONFIG_SET, &[("key", &m[1]), ("value", &m[2])])),
        ),
        (
            r"(?i)^(?:менеджмент|управление)\s+(\S+)(?:\s+(.+))?$",
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

/// Try to resolve `text` using quick regex patterns.
///
/// Pure function of the text; returns `None` when no pattern produces a
/// command intent.
pub fn resolve_quick(text: &str) -> Option<Intent> {
    let stripped = text.trim();
    if stripped.is_empty() {
        return None;
    }
    for (pattern, builder) in PATTERNS.iter() {
        let Some(caps) = pattern.captures(stripped) else {
            continue;
        };
        if let Some(intent) = builder(&caps)
            && intent.is_command()
        {
            return Some(intent);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_with_content() {
        let intent = resolve_quick("создай файл note.txt с содержимым привет").unwrap();
        assert_eq!(intent.name.as_deref(), Some("files.create"));
        assert_eq!(intent.get_str("path"), Some("note.txt"));
        assert_eq!(intent.get_str("content"), Some("привет"));
        assert_eq!(intent.meta.rule.as_deref(), Some("quick_ru"));
        assert_eq!(intent.meta.source.as_deref(), Some("quick"));
    }

    #[test]
    fn test_create_without_content() {
        let intent = resolve_quick("создать файл empty.txt").unwrap();
        assert_eq!(intent.name.as_deref(), Some("files.create"));
        assert_eq!(intent.get_str("content"), Some(""));
    }

    #[test]
    fn test_read_strips_quotes() {
        let intent = resolve_quick("прочитай файл \"notes.txt\"").unwrap();
        assert_eq!(intent.name.as_deref(), Some("files.read"));
        assert_eq!(intent.get_str("path"), Some("notes.txt"));
    }

    #[test]
    fn test_append_with_colon_separator() {
        let intent = resolve_quick("допиши в файл story.txt: финал").unwrap();
        assert_eq!(intent.name.as_deref(), Some("files.append"));
        assert_eq!(intent.get_str("path"), Some("story.txt"));
        assert_eq!(intent.get_str("content"), Some("финал"));
    }

    #[test]
    fn test_list_default_mask() {
        let intent = resolve_quick("файлы").unwrap();
        assert_eq!(intent.name.as_deref(), Some("files.list"));
        assert_eq!(intent.get_str("mask"), Some("*"));
    }

    #[test]
    fn test_list_with_mask() {
        let intent = resolve_quick("покажи *.md").unwrap();
        assert_eq!(intent.get_str("mask"), Some("*.md"));
    }

    #[test]
    fn test_config_set() {
        let intent = resolve_quick("конфиг установить ui.lang ru").unwrap();
        assert_eq!(intent.name.as_deref(), Some("system.config_set"));
        assert_eq!(intent.get_str("key"), Some("ui.lang"));
        assert_eq!(intent.get_str("value"), Some("ru"));
    }

    #[test]
    fn test_management_quick_form() {
        let intent = resolve_quick("управление complete_task task_id=9").unwrap();
        assert_eq!(intent.name.as_deref(), Some("management.execute"));
        assert_eq!(intent.get_str("action"), Some("complete_task"));
        assert_eq!(intent.get_str("task_id"), Some("9"));
    }

    #[test]
    fn test_management_bad_token_rejects_whole_match() {
        assert!(resolve_quick("менеджмент start_task oops").is_none());
    }

    #[test]
    fn test_case_insensitive_cyrillic() {
        let intent = resolve_quick("ПРОЧИТАЙ файл a.txt").unwrap();
        assert_eq!(intent.name.as_deref(), Some("files.read"));
    }

    #[test]
    fn test_no_match_returns_none() {
        assert!(resolve_quick("привет, как дела?").is_none());
        assert!(resolve_quick("").is_none());
        assert!(resolve_quick("   ").is_none());
    }
}
