use icu_normalizer::ComposingNormalizerBorrowed;

/// Reveal every still-masked word of `masked` that one of the whitespace
/// separated tokens in `input` spells, ignoring case, digits and punctuation.
///
/// Repeated words are revealed at every unrevealed occurrence. Blank input
/// returns `masked` untouched; otherwise the result is space-joined.
pub fn unmask(masked: &str, original: &str, input: &str) -> String {
    if input.trim().is_empty() {
        return masked.to_string();
    }

    let original_words: Vec<&str> = original.split_whitespace().collect();
    let mut masked_words: Vec<&str> = masked.split_whitespace().collect();
    let original_keys: Vec<String> = original_words.iter().map(|w| match_key(w)).collect();

    for token in input.split_whitespace() {
        let token_key = match_key(token);
        for (i, word) in original_words.iter().enumerate() {
            let Some(current) = masked_words.get(i) else {
                break;
            };
            if current == word {
                continue;
            }
            if original_keys[i] == token_key {
                masked_words[i] = *word;
            }
        }
    }

    masked_words.join(" ")
}

/// Comparison key for a word: NFC-composed, letters only, lowercased.
pub fn match_key(word: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(word)
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Positions whose masked word already equals the original word.
pub fn revealed_positions(masked: &str, original: &str) -> Vec<usize> {
    original
        .split_whitespace()
        .zip(masked.split_whitespace())
        .enumerate()
        .filter(|(_, (o, m))| o == m)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_word_reveals_every_occurrence() {
        let revealed = unmask("___ cat and ___ dog", "the cat and the dog", "the");
        assert_eq!(revealed, "the cat and the dog");
    }

    #[test]
    fn test_match_ignores_case_and_punctuation() {
        assert_eq!(unmask("___'_", "don't", "DONT"), "don't");
        assert_eq!(unmask("_____!", "Hello!", "hello"), "Hello!");
        assert_eq!(unmask("_____", "hello", "h.e.l.l.o"), "hello");
    }

    #[test]
    fn test_multiple_tokens_in_one_submission() {
        let original = "good morning everybody";
        let masked = "good _______ _________";
        assert_eq!(unmask(masked, original, "morning everybody"), original);
        assert_eq!(
            unmask(masked, original, "  everybody  "),
            "good _______ everybody"
        );
    }

    #[test]
    fn test_non_matching_input_leaves_mask() {
        let masked = "____ _______";
        assert_eq!(unmask(masked, "good morning", "evening"), masked);
    }

    #[test]
    fn test_blank_input_is_noop() {
        let masked = "____   _______";
        assert_eq!(unmask(masked, "good morning", ""), masked);
        assert_eq!(unmask(masked, "good morning", "   "), masked);
    }

    #[test]
    fn test_unmask_is_idempotent() {
        let original = "The cat, the hat and 3 bats.";
        let masked = "___ ___, ___ ___ ___ _ _____";
        for input in ["the", "cat hat", "3", "bats and THE", "nothing"] {
            let once = unmask(masked, original, input);
            let twice = unmask(&once, original, input);
            assert_eq!(once, twice, "input {input:?}");
        }
        assert_eq!(unmask(original, original, "the"), original);
    }

    #[test]
    fn test_digit_tokens_reveal_number_words() {
        // Neither side has letters, so both keys are empty and compare equal.
        let masked = "I have ____ cats";
        assert_eq!(unmask(masked, "I have 1000 cats", "1000"), "I have 1000 cats");
    }

    #[test]
    fn test_decomposed_accent_matches_precomposed() {
        let decomposed = "cafe\u{301}";
        assert_eq!(unmask("____", "café", decomposed), "café");
        assert_eq!(match_key("Café"), match_key(decomposed));
    }

    #[test]
    fn test_revealed_positions() {
        let original = "good morning everybody";
        assert_eq!(
            revealed_positions("good _______ everybody", original),
            vec![0, 2]
        );
        assert!(revealed_positions("____ _______ _________", original).is_empty());
    }
}
