use std::collections::HashMap;

use crate::dataset::{Dataset, Entry};
use crate::engine::mask::max_hint_level;
use crate::engine::policy::{RevealPolicy, RevealToggles};
use crate::session::navigator::Navigator;
use crate::session::sentence::SentenceState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A different file: all progress was discarded.
    Reset,
    /// The same file again: progress was kept.
    Kept,
}

/// Snapshot of the current sentence for rendering.
#[derive(Clone, Debug)]
pub struct SessionView<'a> {
    pub index: usize,
    pub total: usize,
    pub entry: &'a Entry,
    pub masked: &'a str,
    pub hint_level: usize,
    pub max_hint_level: usize,
    pub solved: bool,
    pub solved_count: usize,
    /// Words of this sentence already answered.
    pub revealed_words: usize,
    pub word_count: usize,
    pub policy: RevealPolicy,
}

/// All per-dataset training state. One value per user; nothing is global.
pub struct DictationSession {
    dataset: Dataset,
    sentences: HashMap<usize, SentenceState>,
    nav: Navigator,
    toggles: RevealToggles,
}

impl DictationSession {
    pub fn new(dataset: Dataset, toggles: RevealToggles) -> Self {
        let nav = Navigator::new(dataset.len());
        let mut session = Self {
            dataset,
            sentences: HashMap::new(),
            nav,
            toggles,
        };
        session.visit();
        session
    }

    /// Install a freshly loaded dataset. Progress survives only when the file
    /// identity is unchanged.
    pub fn load(&mut self, dataset: Dataset) -> LoadOutcome {
        if dataset.id() == self.dataset.id() && dataset.len() == self.dataset.len() {
            self.dataset = dataset;
            return LoadOutcome::Kept;
        }
        tracing::info!(
            from = %self.dataset.id().display_name(),
            to = %dataset.id().display_name(),
            "new dataset, resetting session"
        );
        self.nav = Navigator::new(dataset.len());
        self.dataset = dataset;
        self.sentences.clear();
        self.visit();
        LoadOutcome::Reset
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn toggles(&self) -> RevealToggles {
        self.toggles
    }

    pub fn current_index(&self) -> usize {
        self.nav.current()
    }

    pub fn progress(&self) -> f64 {
        self.nav.progress()
    }

    fn original(&self, index: usize) -> &str {
        self.dataset
            .get(index)
            .map(|e| e.english.as_str())
            .unwrap_or("")
    }

    /// Create state for the current index on first visit.
    fn visit(&mut self) {
        let index = self.nav.current();
        if self.sentences.contains_key(&index) {
            return;
        }
        let state = SentenceState::new(self.original(index), &self.toggles);
        self.sentences.insert(index, state);
    }

    #[cfg(test)]
    pub fn state(&self, index: usize) -> Option<&SentenceState> {
        self.sentences.get(&index)
    }

    /// Run `f` against the current sentence's state and original text.
    fn with_current<R>(
        &mut self,
        f: impl FnOnce(&mut SentenceState, &str, &RevealToggles) -> R,
    ) -> R {
        let index = self.nav.current();
        let original = self
            .dataset
            .get(index)
            .map(|e| e.english.as_str())
            .unwrap_or("");
        let state = self
            .sentences
            .entry(index)
            .or_insert_with(|| SentenceState::new(original, &self.toggles));
        f(state, original, &self.toggles)
    }

    pub fn request_hint(&mut self) -> bool {
        self.with_current(|state, original, toggles| state.request_hint(original, toggles))
    }

    pub fn submit(&mut self, input: &str) -> bool {
        self.with_current(|state, original, _| state.submit(original, input))
    }

    /// Replace the toggles and re-render the current sentence with them.
    /// Other visited sentences pick the change up on their next hint.
    pub fn set_toggles(&mut self, toggles: RevealToggles) {
        self.toggles = toggles;
        self.with_current(|state, original, toggles| state.remask(original, toggles));
    }

    pub fn first(&mut self) -> bool {
        self.navigate(Navigator::first)
    }

    pub fn last(&mut self) -> bool {
        self.navigate(Navigator::last)
    }

    pub fn prev(&mut self) -> bool {
        self.navigate(Navigator::prev)
    }

    pub fn next(&mut self) -> bool {
        self.navigate(Navigator::next)
    }

    fn navigate(&mut self, op: fn(&mut Navigator) -> bool) -> bool {
        let changed = op(&mut self.nav);
        self.visit();
        changed
    }

    pub fn is_solved(&self, index: usize) -> bool {
        self.sentences
            .get(&index)
            .is_some_and(|s| s.is_solved(self.original(index)))
    }

    pub fn solved_count(&self) -> usize {
        self.sentences
            .iter()
            .filter(|(i, s)| s.is_solved(self.original(**i)))
            .count()
    }

    pub fn view(&self) -> Option<SessionView<'_>> {
        let index = self.nav.current();
        let entry = self.dataset.get(index)?;
        let state = self.sentences.get(&index)?;
        Some(SessionView {
            index,
            total: self.dataset.len(),
            entry,
            masked: &state.masked,
            hint_level: state.hint_level,
            max_hint_level: max_hint_level(&entry.english),
            solved: state.is_solved(&entry.english),
            solved_count: self.solved_count(),
            revealed_words: state.revealed_words(&entry.english),
            word_count: entry.english.split_whitespace().count(),
            policy: self.toggles.resolve(state.hint_level),
        })
    }
}
