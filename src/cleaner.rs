//! Transcript normalization and correction.

use crate::error::GradeError;
use crate::spell::SpellChecker;
use std::sync::Arc;

/// Cleans raw recognizer output into a scoreable transcript.
pub struct TextCleaner {
    spell: Arc<dyn SpellChecker>,
}

impl TextCleaner {
    pub fn new(spell: Arc<dyn SpellChecker>) -> Self {
        Self { spell }
    }

    /// Lowercase, drop everything that is not a letter, digit, whitespace,
    /// period or comma, and collapse whitespace runs into single spaces.
    pub fn normalize(raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let filtered: String = lowered
            .chars()
            .filter(|c| {
                c.is_ascii_lowercase()
                    || c.is_ascii_digit()
                    || c.is_whitespace()
                    || *c == '.'
                    || *c == ','
            })
            .collect();

        filtered.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Normalize the transcript, then run each token through the spelling
    /// collaborator and rejoin with single spaces.
    ///
    /// Empty or whitespace-only input is an error; the caller reports the
    /// segment as failed instead of scoring it.
    pub fn clean(&self, raw: &str) -> Result<String, GradeError> {
        if raw.trim().is_empty() {
            return Err(GradeError::EmptyTranscript);
        }

        let normalized = Self::normalize(raw);
        let corrected: Vec<String> = normalized
            .split_whitespace()
            .map(|token| self.spell.correct(token))
            .collect();

        Ok(corrected.join(" "))
    }
}
