//! Lexical command hints — the veto predicate for remote decisions.
//!
//! A remote classifier can over-eagerly emit a command for ordinary
//! conversation. Before trusting a remote command intent, the resolver
//! checks the original text for some lexical trace of command intent: an
//! action verb or a file-like token. The heuristic is deliberately a
//! keyword/pattern check, not a semantic classifier, and is pluggable so
//! deployments can tighten or relax it.

use regex::Regex;
use std::sync::LazyLock;

/// Predicate deciding whether raw text plausibly asks for a command.
pub trait CommandHints: Send + Sync {
    fn looks_like_command(&self, text: &str) -> bool;
}

const ACTION_WORDS: &[&str] = &[
    // RU verbs the rule tables key off
    "создай",
    "создать",
    "прочитай",
    "прочитать",
    "покажи",
    "показать",
    "выведи",
    "допиши",
    "добавь",
    "открой",
    "открыть",
    "запусти",
    "список",
    "файл",
    "файлы",
    "папка",
    "ярлык",
    "конфиг",
    "помощь",
    "менеджмент",
    "управление",
    // EN equivalents occasionally mixed in
    "create",
    "read",
    "open",
    "show",
    "list",
    "append",
    "file",
    "files",
];

static RE_FILE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:\*\.[a-z0-9]+|\b[\w\-./\\]+\.[a-z0-9]{1,8}\b)").unwrap());

/// Default hint heuristic: any known action word or any file-like token.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalHints;

impl CommandHints for LexicalHints {
    fn looks_like_command(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        if ACTION_WORDS.iter().any(|word| lower.contains(word)) {
            return true;
        }
        RE_FILE_TOKEN.is_match(&lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_conversation_has_no_hint() {
        let hints = LexicalHints;
        assert!(!hints.looks_like_command("что ты умеешь?"));
        assert!(!hints.looks_like_command("привет"));
        assert!(!hints.looks_like_command("расскажи про погоду"));
    }

    #[test]
    fn test_action_verb_is_a_hint() {
        let hints = LexicalHints;
        assert!(hints.looks_like_command("мне нужно показать файлы проекта"));
        assert!(hints.looks_like_command("создай что-нибудь"));
    }

    #[test]
    fn test_file_token_is_a_hint() {
        let hints = LexicalHints;
        assert!(hints.looks_like_command("а что в notes.txt?"));
        assert!(hints.looks_like_command("глянь *.md"));
    }

    #[test]
    fn test_english_verbs_count() {
        let hints = LexicalHints;
        assert!(hints.looks_like_command("open the report"));
    }
}
