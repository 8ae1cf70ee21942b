//! Per-word spelling correction.

use crate::error::GradeError;
use crate::fetch::ensure_cached;
use std::collections::{HashMap, HashSet};

/// English word-frequency list (word + corpus count per line)
const DICTIONARY_URL: &str =
    "https://raw.githubusercontent.com/wolfgarbe/SymSpell/master/SymSpell/frequency_dictionary_en_82_765.txt";

/// Spelling-correction collaborator, queried once per token.
///
/// `correct` returns the token unchanged when it already is a known word
/// or no better candidate exists within the edit-distance budget.
/// Correction is per-token with no sentence context: real-word errors pass
/// through, and rare or technical terms can be replaced with a more common
/// neighbor.
pub trait SpellChecker: Send + Sync {
    fn correct(&self, word: &str) -> String;
}

/// Checker backed by a word-frequency dictionary.
///
/// Candidates are generated within edit distance 1 of the input and ranked
/// by corpus frequency, with an alphabetical tie-break for determinism.
pub struct FrequencyDictChecker {
    frequencies: HashMap<String, u64>,
}

impl FrequencyDictChecker {
    /// Load the English frequency dictionary, downloading it on first use.
    pub fn new() -> Result<Self, GradeError> {
        let path = ensure_cached(DICTIONARY_URL, "frequency_dictionary_en.txt")?;
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            GradeError::Initialization(format!("Failed to read dictionary: {}", e))
        })?;

        let checker = Self::from_word_counts(contents.lines().filter_map(parse_line));
        tracing::info!("Loaded {} dictionary words", checker.frequencies.len());
        Ok(checker)
    }

    /// Build a checker from explicit word counts
    pub fn from_word_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        Self {
            frequencies: counts.into_iter().collect(),
        }
    }
}

impl SpellChecker for FrequencyDictChecker {
    fn correct(&self, word: &str) -> String {
        // Numbers and single characters are not worth second-guessing
        if word.len() <= 1
            || word.chars().any(|c| c.is_ascii_digit())
            || self.frequencies.contains_key(word)
        {
            return word.to_string();
        }

        edits1(word)
            .into_iter()
            .filter_map(|candidate| {
                self.frequencies
                    .get(&candidate)
                    .copied()
                    .map(|freq| (candidate, freq))
            })
            .max_by(|(word_a, freq_a), (word_b, freq_b)| {
                freq_a.cmp(freq_b).then_with(|| word_b.cmp(word_a))
            })
            .map(|(candidate, _)| candidate)
            .unwrap_or_else(|| word.to_string())
    }
}

fn parse_line(line: &str) -> Option<(String, u64)> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?;
    let count = parts.next()?.parse().ok()?;
    Some((word.to_string(), count))
}

/// Every string within one edit of `word`: deletes, adjacent transposes,
/// replaces, and inserts over the ASCII alphabet.
fn edits1(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut edits = HashSet::new();

    for i in 0..=chars.len() {
        if i < chars.len() {
            let mut deleted = chars.clone();
            deleted.remove(i);
            edits.insert(deleted.into_iter().collect());
        }

        if i + 1 < chars.len() {
            let mut transposed = chars.clone();
            transposed.swap(i, i + 1);
            edits.insert(transposed.into_iter().collect());
        }

        for letter in b'a'..=b'z' {
            let letter = letter as char;

            if i < chars.len() {
                let mut replaced = chars.clone();
                replaced[i] = letter;
                edits.insert(replaced.into_iter().collect());
            }

            let mut inserted = chars.clone();
            inserted.insert(i, letter);
            edits.insert(inserted.into_iter().collect());
        }
    }

    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> FrequencyDictChecker {
        FrequencyDictChecker::from_word_counts(
            [
                ("the".to_string(), 1_000_000u64),
                ("hello".to_string(), 900),
                ("help".to_string(), 800),
                ("sky".to_string(), 500),
                ("blue".to_string(), 400),
            ]
            .into_iter(),
        )
    }

    #[test]
    fn test_known_word_unchanged() {
        assert_eq!(checker().correct("hello"), "hello");
    }

    #[test]
    fn test_distance_one_typo_corrected() {
        // "helo" is one insert from "hello" and one replace from "help";
        // the more frequent candidate wins
        assert_eq!(checker().correct("helo"), "hello");
    }

    #[test]
    fn test_transposition_corrected() {
        assert_eq!(checker().correct("teh"), "the");
    }

    #[test]
    fn test_unknown_word_without_candidates_unchanged() {
        assert_eq!(checker().correct("xylophone"), "xylophone");
    }

    #[test]
    fn test_tokens_with_digits_unchanged() {
        assert_eq!(checker().correct("42nd"), "42nd");
    }

    #[test]
    fn test_single_character_unchanged() {
        assert_eq!(checker().correct("a"), "a");
    }

    #[test]
    fn test_edits1_contains_all_edit_kinds() {
        let edits = edits1("ab");
        assert!(edits.contains("b")); // delete
        assert!(edits.contains("ba")); // transpose
        assert!(edits.contains("ob")); // replace
        assert!(edits.contains("abc")); // insert
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("the 23135851162"), Some(("the".to_string(), 23135851162)));
        assert_eq!(parse_line("malformed"), None);
        assert_eq!(parse_line(""), None);
    }
}
