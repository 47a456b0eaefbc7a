use crate::engine::MASK_GLYPH;
use crate::engine::policy::RevealPolicy;

/// Render `original` with characters hidden according to `policy`.
///
/// Words in `current` that already equal their original counterpart are
/// finalized and copied through untouched, whatever the policy says. Passing
/// `None` treats every word as fully masked. The output always has exactly as
/// many words as `original`; runs of whitespace collapse to single spaces.
pub fn mask(original: &str, current: Option<&str>, policy: &RevealPolicy) -> String {
    if policy.reveal_all {
        return original.to_string();
    }

    let current_words: Vec<&str> = current
        .map(|c| c.split_whitespace().collect())
        .unwrap_or_default();

    original
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let current_word = current_words.get(i).copied().unwrap_or("");
            if current_word == word {
                word.to_string()
            } else {
                mask_word(word, policy)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn mask_word(word: &str, policy: &RevealPolicy) -> String {
    word.chars()
        .enumerate()
        .map(|(pos, ch)| {
            if policy.hide_all {
                MASK_GLYPH
            } else if policy.show_punctuation && !ch.is_alphanumeric() {
                ch
            } else if policy.show_numbers && ch.is_ascii_digit() {
                ch
            } else if ch.is_alphabetic() && pos < policy.hint_level {
                ch
            } else {
                MASK_GLYPH
            }
        })
        .collect()
}

/// Character count of the longest word, i.e. the hint level at which every
/// letter is visible.
pub fn max_hint_level(original: &str) -> usize {
    original
        .split_whitespace()
        .map(|w| w.chars().count())
        .max()
        .unwrap_or(0)
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
