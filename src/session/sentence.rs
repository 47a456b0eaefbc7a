use crate::engine::mask::{mask, max_hint_level, normalize_whitespace};
use crate::engine::policy::RevealToggles;
use crate::engine::unmask::{revealed_positions, unmask};

/// Progress on one sentence of the dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentenceState {
    pub masked: String,
    pub hint_level: usize,
}

impl SentenceState {
    pub fn new(original: &str, toggles: &RevealToggles) -> Self {
        Self {
            masked: mask(original, None, &toggles.resolve(0)),
            hint_level: 0,
        }
    }

    /// Solved once every word is revealed. Compared against the
    /// whitespace-normalized original because masking collapses whitespace.
    pub fn is_solved(&self, original: &str) -> bool {
        self.masked == original || self.masked == normalize_whitespace(original)
    }

    /// Reveal one more leading letter of every unsolved word. Returns false
    /// when the sentence is solved or already at the maximum hint level.
    pub fn request_hint(&mut self, original: &str, toggles: &RevealToggles) -> bool {
        if self.is_solved(original) || self.hint_level >= max_hint_level(original) {
            return false;
        }
        self.hint_level += 1;
        self.remask(original, toggles);
        tracing::debug!(hint_level = self.hint_level, "hint applied");
        true
    }

    /// Apply a free-text submission. Returns true if any word was revealed.
    pub fn submit(&mut self, original: &str, input: &str) -> bool {
        let next = unmask(&self.masked, original, input);
        if next == self.masked {
            return false;
        }
        tracing::debug!(input, "words matched");
        self.masked = next;
        true
    }

    /// Re-render with the current hint level, keeping finalized words.
    pub fn remask(&mut self, original: &str, toggles: &RevealToggles) {
        self.masked = mask(
            original,
            Some(&self.masked),
            &toggles.resolve(self.hint_level),
        );
    }

    pub fn revealed_words(&self, original: &str) -> usize {
        revealed_positions(&self.masked, original).len()
    }
}
