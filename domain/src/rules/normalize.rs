//! Utterance normalization shared by rule matchers and slot extraction.

use regex::Regex;
use std::sync::LazyLock;

const WAKE_WORDS: &[&str] = &["геральд", "herald", "джарвис", "jarvis", "жарвис"];
const FILLERS: &[&str] = &[
    "надо бы",
    "пожалуйста",
    "плиз",
    "будь добр",
    "давай",
    "можешь",
    "пожалста",
];

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

fn replace_typographic_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '“' | '”' | '«' | '»' => '"',
            '‘' | '’' => '\'',
            other => other,
        })
        .collect()
}

/// Lowercase, unify quotes, strip wake words and politeness fillers,
/// collapse whitespace.
pub fn normalize(text: &str) -> String {
    let mut t = replace_typographic_quotes(text.trim().to_lowercase().as_str());
    for word in WAKE_WORDS.iter().chain(FILLERS) {
        let pattern = format!(r"\b{}\b", regex::escape(word));
        let re = Regex::new(&pattern).unwrap();
        t = re.replace_all(&t, " ").into_owned();
    }
    WHITESPACE.replace_all(t.trim(), " ").into_owned()
}

/// Trim a string argument: surrounding whitespace, typographic quotes,
/// one matching pair of outer quotes, doubled backslashes.
pub fn clean_str(value: &str) -> String {
    let mut text = replace_typographic_quotes(value.trim());
    let bytes = text.as_bytes();
    if text.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            text = text[1..text.len() - 1].trim().to_string();
        }
    }
    text.replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_wake_word_and_fillers() {
        assert_eq!(
            normalize("Джарвис, пожалуйста покажи файлы"),
            ", покажи файлы"
        );
        assert_eq!(normalize("  двойные   пробелы  "), "двойные пробелы");
    }

    #[test]
    fn test_normalize_unifies_quotes() {
        assert_eq!(normalize("прочитай «файл»"), "прочитай \"файл\"");
    }

    #[test]
    fn test_clean_str_strips_outer_quotes() {
        assert_eq!(clean_str("\"notes.txt\""), "notes.txt");
        assert_eq!(clean_str("'notes.txt'"), "notes.txt");
        assert_eq!(clean_str("  plain  "), "plain");
    }

    #[test]
    fn test_clean_str_keeps_unbalanced_quote() {
        assert_eq!(clean_str("\"notes.txt"), "\"notes.txt");
    }

    #[test]
    fn test_clean_str_collapses_escaped_backslashes() {
        assert_eq!(clean_str("dir\\\\file.txt"), "dir\\file.txt");
    }
}
