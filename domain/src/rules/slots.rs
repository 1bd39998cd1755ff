//! Best-effort slot extraction from a normalized utterance.
//!
//! Pulls `path`, `mask`, config `key`/`value` and trailing `text` content.
//! Path detection is tiered: a quoted span wins, then the first token after
//! a known action verb, then any extension-bearing token.

use serde_json::{Map, Value};
use std::sync::LazyLock;

use regex::Regex;

static RE_IN_QUOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

static RE_EXT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([\w\-\./\\]+?\.[a-z0-9]{1,8})\b").unwrap());

static RE_PATH_AFTER_VERB: LazyLock<Regex> = LazyLock::new(|| {
    let verbs = [
        r"(?:создай(?:\s+файл)?)",
        r"(?:создать(?:\s+файл)?)",
        r"(?:допиши(?:\s+в)?)",
        r"(?:прочитай|покажи\s+содержимое|выведи)",
        r"(?:открой|open|запусти)",
        r"(?:покажи|показать\s+в\s+проводнике|show\s+in\s+explorer|открой\s+папку)",
    ];
    Regex::new(&format!(r#"(?i)(?:{})\s+([^\s"']+)"#, verbs.join("|"))).unwrap()
});

static RE_MASK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\*\.[a-z0-9]+").unwrap());

static RE_CONFIG_SET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"конфиг установить\s+(\S+)\s+(.+)").unwrap());

static RE_TEXT_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:допиши|с содержимым)\s+(.+)$").unwrap());

fn strip_quotes(value: &str) -> String {
    value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// Extract argument slots from a normalized utterance.
pub fn extract_slots(text: &str) -> Map<String, Value> {
    let mut slots = Map::new();

    if let Some(caps) = RE_IN_QUOTES.captures(text) {
        slots.insert("path".into(), Value::String(caps[1].trim().to_string()));
    }

    if !slots.contains_key("path")
        && let Some(caps) = RE_PATH_AFTER_VERB.captures(text)
    {
        slots.insert("path".into(), Value::String(caps[1].trim().to_string()));
    }

    if !slots.contains_key("path")
        && let Some(caps) = RE_EXT_TOKEN.captures(text)
    {
        slots.insert("path".into(), Value::String(caps[1].trim().to_string()));
    }

    if text.contains("на питоне") || text.contains("python") {
        slots.insert("mask".into(), Value::String("*.py".into()));
    } else if let Some(m) = RE_MASK.find(text) {
        slots.insert("mask".into(), Value::String(m.as_str().to_string()));
    }

    if let Some(caps) = RE_CONFIG_SET.captures(text) {
        slots.insert("key".into(), Value::String(caps[1].to_string()));
        slots.insert("value".into(), Value::String(strip_quotes(&caps[2])));
    }

    if !slots.contains_key("text")
        && let Some(caps) = RE_TEXT_TAIL.captures(text)
    {
        slots.insert("text".into(), Value::String(strip_quotes(&caps[1])));
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_path_wins() {
        let slots = extract_slots("прочитай \"notes/plan.md\" или plan.txt");
        assert_eq!(slots["path"], "notes/plan.md");
    }

    #[test]
    fn test_path_after_verb() {
        let slots = extract_slots("создай файл notes/todo.txt");
        assert_eq!(slots["path"], "notes/todo.txt");
    }

    #[test]
    fn test_extension_token_fallback() {
        let slots = extract_slots("что там в report.pdf лежит");
        assert_eq!(slots["path"], "report.pdf");
    }

    #[test]
    fn test_python_mask() {
        let slots = extract_slots("покажи файлы на питоне");
        assert_eq!(slots["mask"], "*.py");
    }

    #[test]
    fn test_explicit_mask() {
        let slots = extract_slots("файлы *.md");
        assert_eq!(slots["mask"], "*.md");
    }

    #[test]
    fn test_config_key_value() {
        let slots = extract_slots("конфиг установить ui.lang \"ru\"");
        assert_eq!(slots["key"], "ui.lang");
        assert_eq!(slots["value"], "ru");
    }

    #[test]
    fn test_text_tail() {
        let slots = extract_slots("допиши в файл story.txt финал близко");
        assert_eq!(slots["text"], "в файл story.txt финал близко");
    }

    #[test]
    fn test_no_slots() {
        assert!(extract_slots("как дела").is_empty());
    }
}
