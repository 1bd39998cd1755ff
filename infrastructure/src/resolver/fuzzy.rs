//! Fuzzy path correction for the local resolver backend.
//!
//! A guessed path is tried directly first. On a miss, the guess is
//! re-typed through the qwerty→йцукен keyboard map (a frequent mistake
//! when the layout was not switched) and ranked against existing files by
//! normalized similarity. `allow_new` (create/append) accepts a contained
//! path that does not exist yet.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::security::{contained_path, relative_inside};

const QWERTY: &str = "qwertyuiop[]asdfghjkl;'zxcvbnm,.";
const CYRILLIC: &str = "йцукенгшщзхъфывапролджэячсмитьбю";

/// Re-type a string as if the keyboard layout had been switched.
pub fn keyboard_translate(text: &str) -> String {
    text.chars()
        .map(|c| {
            QWERTY
                .chars()
                .position(|q| q == c)
                .and_then(|idx| CYRILLIC.chars().nth(idx))
                .unwrap_or(c)
        })
        .collect()
}

fn walk_files(workspace: &Path) -> Vec<std::path::PathBuf> {
    let pattern = format!("{}/**/*", workspace.display());
    glob::glob(&pattern)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|p| p.is_file())
                .collect()
        })
        .unwrap_or_default()
}

/// Nearest existing file by file-name similarity, if any.
fn best_candidate(workspace: &Path, guess: &str) -> Option<std::path::PathBuf> {
    let guess_lower = guess.to_lowercase();
    let mut best: (f64, Option<std::path::PathBuf>) = (0.0, None);
    for path in walk_files(workspace) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let score = strsim::normalized_levenshtein(&name.to_lowercase(), &guess_lower);
        if score > best.0 {
            best = (score, Some(path));
        }
    }
    best.1
}

/// Correct the `path` slot in place.
pub fn try_fuzzy_path(workspace: &Path, slots: &mut Map<String, Value>, allow_new: bool) {
    let Some(guess) = slots.get("path").and_then(|v| v.as_str()).map(str::to_string) else {
        return;
    };

    // Direct containment check first.
    if let Some(direct) = contained_path(workspace, &guess) {
        if direct.exists() || allow_new {
            if let Some(rel) = relative_inside(workspace, &direct) {
                slots.insert("path".into(), Value::String(rel));
                return;
            }
        }
    }

    // Keyboard-layout correction, then similarity ranking.
    let translated = keyboard_translate(&guess);
    let ranked_guess = if translated.chars().count() >= 3 {
        translated
    } else {
        guess.clone()
    };
    if let Some(candidate) = best_candidate(workspace, &ranked_guess)
        && let Some(rel) = relative_inside(workspace, &candidate)
    {
        debug!(%guess, corrected = %rel, "fuzzy path match");
        slots.insert("path".into(), Value::String(rel));
        return;
    }

    if allow_new {
        // Nothing matched but the operation may create the file: keep a
        // normalized relative guess.
        let fallback = guess.replace('\\', "/").trim_start_matches('/').to_string();
        slots.insert("path".into(), Value::String(fallback));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn slots_with_path(path: &str) -> Map<String, Value> {
        let mut slots = Map::new();
        slots.insert("path".into(), json!(path));
        slots
    }

    #[test]
    fn test_keyboard_translate() {
        assert_eq!(keyboard_translate("ghbdtn"), "привет");
        assert_eq!(keyboard_translate("уже русский"), "уже русский");
    }

    #[test]
    fn test_direct_hit_kept() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let mut slots = slots_with_path("notes.txt");
        try_fuzzy_path(dir.path(), &mut slots, false);
        assert_eq!(slots["path"], "notes.txt");
    }

    #[test]
    fn test_near_miss_corrected_to_existing_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("report.txt"), "x").unwrap();
        let mut slots = slots_with_path("reprot.txt");
        try_fuzzy_path(dir.path(), &mut slots, false);
        assert_eq!(slots["path"], "report.txt");
    }

    #[test]
    fn test_wrong_layout_corrected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("привет.txt"), "x").unwrap();
        // "ghbdtn" is "привет" typed on the wrong layout.
        let mut slots = slots_with_path("ghbdtn.txt");
        try_fuzzy_path(dir.path(), &mut slots, false);
        assert_eq!(slots["path"], "привет.txt");
    }

    #[test]
    fn test_allow_new_keeps_contained_guess() {
        let dir = tempdir().unwrap();
        let mut slots = slots_with_path("drafts/new.txt");
        try_fuzzy_path(dir.path(), &mut slots, true);
        assert_eq!(slots["path"], "drafts/new.txt");
    }

    #[test]
    fn test_missing_file_without_allow_new_left_as_is() {
        let dir = tempdir().unwrap();
        let mut slots = slots_with_path("ghost.txt");
        try_fuzzy_path(dir.path(), &mut slots, false);
        // No candidates to rank against; the guess stays untouched.
        assert_eq!(slots["path"], "ghost.txt");
    }
}
