use serde::{Deserialize, Serialize};

/// Everything the masking engine needs to decide how much of a word to show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealPolicy {
    pub reveal_all: bool,
    pub hide_all: bool,
    pub show_punctuation: bool,
    pub show_numbers: bool,
    pub hint_level: usize,
}

/// The user-facing checkboxes. Several combinations are contradictory, so they
/// only reach the engine through [`RevealToggles::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealToggles {
    pub reveal_all: bool,
    pub hide_all: bool,
    pub show_punctuation: bool,
    pub show_numbers: bool,
}

impl Default for RevealToggles {
    fn default() -> Self {
        Self {
            reveal_all: false,
            hide_all: false,
            show_punctuation: true,
            show_numbers: true,
        }
    }
}

impl RevealToggles {
    /// Reveal-all beats hide-all, and either one overrides the per-class toggles.
    pub fn resolve(&self, hint_level: usize) -> RevealPolicy {
        if self.reveal_all {
            RevealPolicy {
                reveal_all: true,
                hide_all: false,
                show_punctuation: true,
                show_numbers: true,
                hint_level,
            }
        } else if self.hide_all {
            RevealPolicy {
                reveal_all: false,
                hide_all: true,
                show_punctuation: false,
                show_numbers: false,
                hint_level,
            }
        } else {
            RevealPolicy {
                reveal_all: false,
                hide_all: false,
                show_punctuation: self.show_punctuation,
                show_numbers: self.show_numbers,
                hint_level,
            }
        }
    }

    pub fn toggle_reveal_all(&mut self) {
        self.reveal_all = !self.reveal_all;
        if self.reveal_all {
            self.hide_all = false;
        }
    }

    pub fn toggle_hide_all(&mut self) {
        self.hide_all = !self.hide_all;
        if self.hide_all {
            self.reveal_all = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shows_punctuation_and_numbers() {
        let policy = RevealToggles::default().resolve(0);
        assert!(policy.show_punctuation);
        assert!(policy.show_numbers);
        assert!(!policy.hide_all);
        assert!(!policy.reveal_all);
    }

    #[test]
    fn test_reveal_all_wins_over_hide_all() {
        let toggles = RevealToggles {
            reveal_all: true,
            hide_all: true,
            show_punctuation: false,
            show_numbers: false,
        };
        let policy = toggles.resolve(2);
        assert!(policy.reveal_all);
        assert!(!policy.hide_all);
        assert!(policy.show_punctuation);
        assert!(policy.show_numbers);
        assert_eq!(policy.hint_level, 2);
    }

    #[test]
    fn test_hide_all_clears_leniency() {
        let toggles = RevealToggles {
            hide_all: true,
            ..RevealToggles::default()
        };
        let policy = toggles.resolve(0);
        assert!(policy.hide_all);
        assert!(!policy.show_punctuation);
        assert!(!policy.show_numbers);
    }

    #[test]
    fn test_toggles_are_mutually_exclusive() {
        let mut toggles = RevealToggles::default();
        toggles.toggle_hide_all();
        assert!(toggles.hide_all);
        toggles.toggle_reveal_all();
        assert!(toggles.reveal_all);
        assert!(!toggles.hide_all);
        toggles.toggle_hide_all();
        assert!(toggles.hide_all);
        assert!(!toggles.reveal_all);
    }
}
