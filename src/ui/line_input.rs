use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dataset::reader::Format;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// What Tab completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    None,
    /// Directories and files in a format the dataset loader accepts.
    DatasetPaths,
}

/// Single-line editor with readline-style keys.
pub struct LineInput {
    text: String,
    /// Char index; 0 is before the first char.
    cursor: usize,
    mode: Completion,
    completions: Vec<String>,
    completion_index: Option<usize>,
    completion_seed: String,
    /// Set when the last directory scan failed.
    pub completion_error: bool,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self::with_completion(text, Completion::None)
    }

    pub fn with_completion(text: &str, mode: Completion) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            mode,
            completions: Vec::new(),
            completion_index: None,
            completion_seed: String::new(),
            completion_error: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clear the line and hand back what was typed.
    pub fn take(&mut self) -> String {
        self.reset_completion();
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn set(&mut self, text: &str) {
        self.reset_completion();
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    /// (before cursor, char under cursor, after cursor). The middle is None
    /// when the cursor sits past the end.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            None => (&self.text, None, ""),
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Tab => self.tab_complete(true),
            KeyCode::BackTab => self.tab_complete(false),
            code => {
                self.reset_completion();
                match code {
                    KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
                    KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
                    KeyCode::Home => self.cursor = 0,
                    KeyCode::End => self.cursor = self.len(),
                    KeyCode::Backspace if self.cursor > 0 => {
                        self.cursor -= 1;
                        self.remove_at(self.cursor);
                    }
                    KeyCode::Delete if self.cursor < self.len() => self.remove_at(self.cursor),
                    KeyCode::Char('a') if ctrl => self.cursor = 0,
                    KeyCode::Char('e') if ctrl => self.cursor = self.len(),
                    KeyCode::Char('u') if ctrl => {
                        self.text.clear();
                        self.cursor = 0;
                    }
                    KeyCode::Char('w') if ctrl => self.delete_word_back(),
                    KeyCode::Char(ch) if !ctrl => {
                        let byte_offset = self.char_to_byte(self.cursor);
                        self.text.insert(byte_offset, ch);
                        self.cursor += 1;
                    }
                    _ => {}
                }
            }
        }
        InputResult::Continue
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn remove_at(&mut self, char_idx: usize) {
        let start = self.char_to_byte(char_idx);
        let end = self.char_to_byte(char_idx + 1);
        self.text.replace_range(start..end, "");
    }

    /// unix-word-rubout: trailing whitespace, then the word before it.
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }

    fn reset_completion(&mut self) {
        self.completions.clear();
        self.completion_index = None;
        self.completion_seed.clear();
        self.completion_error = false;
    }

    fn tab_complete(&mut self, forward: bool) {
        if self.mode == Completion::None || self.cursor < self.len() {
            return;
        }

        match self.completion_index {
            None => {
                self.completion_seed = self.text.clone();
                self.completion_error = false;
                self.completions = self.build_completions();
                if !self.completions.is_empty() {
                    self.apply_completion(0);
                }
            }
            Some(idx) => {
                let count = self.completions.len();
                let next = if forward {
                    (idx + 1) % count
                } else {
                    (idx + count - 1) % count
                };
                self.apply_completion(next);
            }
        }
    }

    fn apply_completion(&mut self, idx: usize) {
        self.completion_index = Some(idx);
        self.text = self.completions[idx].clone();
        self.cursor = self.len();
    }

    fn build_completions(&mut self) -> Vec<String> {
        let seed = self.completion_seed.clone();

        let (dir_str, partial) = match seed.rfind(['/', '\\']) {
            Some(pos) => (&seed[..=pos], &seed[pos + 1..]),
            None => ("", seed.as_str()),
        };

        // Expand ~ for read_dir but keep it in what the user sees
        let expanded_dir = match (dir_str.strip_prefix('~'), dirs::home_dir()) {
            (Some(rest), Some(home)) => format!("{}{rest}", home.to_string_lossy()),
            _ if dir_str.is_empty() => ".".to_string(),
            _ => dir_str.to_string(),
        };

        let entries = match std::fs::read_dir(&expanded_dir) {
            Ok(rd) => rd,
            Err(_) => {
                self.completion_error = true;
                return Vec::new();
            }
        };

        let entry_iter = entries.map(|result| {
            result.map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
                (name, is_dir)
            })
        });

        self.collect_completions(entry_iter, dir_str, partial)
    }

    /// Filter, sort (directories first) and cap candidate entries. Split out
    /// so tests can feed synthetic listings.
    fn collect_completions(
        &mut self,
        entries: impl Iterator<Item = std::io::Result<(String, bool)>>,
        dir_str: &str,
        partial: &str,
    ) -> Vec<String> {
        let sep = std::path::MAIN_SEPARATOR;
        let include_hidden = partial.starts_with('.');

        let mut candidates: Vec<(bool, String)> = Vec::new();
        for entry_result in entries.take(1000) {
            let (name, is_dir) = match entry_result {
                Ok(pair) => pair,
                Err(_) => {
                    self.completion_error = true;
                    return Vec::new();
                }
            };
            if !include_hidden && name.starts_with('.') {
                continue;
            }
            if !name.starts_with(partial) {
                continue;
            }
            if !is_dir && Format::from_path(Path::new(&name)).is_err() {
                continue;
            }
            let full = if is_dir {
                format!("{dir_str}{name}{sep}")
            } else {
                format!("{dir_str}{name}")
            };
            candidates.push((is_dir, full));
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        candidates.truncate(100);
        candidates.into_iter().map(|(_, path)| path).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(input: &mut LineInput, s: &str) {
        for ch in s.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn insert_and_move() {
        let mut input = LineInput::new("ac");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "abc");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Char('>')));
        assert_eq!(input.value(), ">abc");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn backspace_and_delete_handle_multibyte() {
        let mut input = LineInput::new("");
        type_str(&mut input, "café");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "caf");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "af");
        let mut empty = LineInput::new("");
        empty.handle(key(KeyCode::Backspace));
        empty.handle(key(KeyCode::Delete));
        assert_eq!(empty.value(), "");
    }

    #[test]
    fn ctrl_shortcuts() {
        let mut input = LineInput::new("good morning  ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "good ");
        input.handle(ctrl('a'));
        assert_eq!(input.cursor, 0);
        input.handle(ctrl('e'));
        assert_eq!(input.cursor, 5);
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn take_clears_the_line() {
        let mut input = LineInput::new("");
        type_str(&mut input, "hello world");
        assert_eq!(input.take(), "hello world");
        assert!(input.is_empty());
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = LineInput::new("x");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }

    #[test]
    fn render_parts_positions() {
        let mut input = LineInput::new("abc");
        assert_eq!(input.render_parts(), ("abc", None, ""));
        input.cursor = 1;
        assert_eq!(input.render_parts(), ("a", Some('b'), "c"));
    }

    #[test]
    fn tab_without_completion_mode_is_noop() {
        let mut input = LineInput::new("/tmp/");
        assert_eq!(input.handle(key(KeyCode::Tab)), InputResult::Continue);
        assert_eq!(input.value(), "/tmp/");
        assert!(input.completions.is_empty());
    }

    #[test]
    fn tab_completes_dataset_files_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("week1.csv"), "").unwrap();
        std::fs::write(dir.path().join("week2.xlsx"), "").unwrap();
        std::fs::write(dir.path().join("notes.pdf"), "").unwrap();
        std::fs::create_dir(dir.path().join("archive")).unwrap();
        let path = format!("{}/", dir.path().display());

        let mut input = LineInput::with_completion(&path, Completion::DatasetPaths);
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.completions.len(), 3);
        assert!(input.value().ends_with(&format!("archive{}", std::path::MAIN_SEPARATOR)));
        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with("week1.csv"));
        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with("week2.xlsx"));
        input.handle(key(KeyCode::BackTab));
        assert!(input.value().ends_with("week1.csv"));
    }

    #[test]
    fn completion_error_on_bad_dir_clears_on_edit() {
        let mut input =
            LineInput::with_completion("/nonexistent_dictr_zzz/", Completion::DatasetPaths);
        input.handle(key(KeyCode::Tab));
        assert!(input.completion_error);
        assert!(input.completions.is_empty());
        input.handle(key(KeyCode::Char('x')));
        assert!(!input.completion_error);
    }

    #[test]
    fn collect_completions_sorts_and_filters() {
        let mut input = LineInput::with_completion("", Completion::DatasetPaths);
        let entries: Vec<std::io::Result<(String, bool)>> = vec![
            Ok(("zeta.csv".to_string(), false)),
            Ok(("alpha_dir".to_string(), true)),
            Ok((".hidden.csv".to_string(), false)),
            Ok(("beta.tsv".to_string(), false)),
            Ok(("readme.md".to_string(), false)),
        ];
        let result = input.collect_completions(entries.into_iter(), "pfx/", "");
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(
            result,
            vec![
                format!("pfx/alpha_dir{sep}"),
                "pfx/beta.tsv".to_string(),
                "pfx/zeta.csv".to_string(),
            ]
        );
    }

    #[test]
    fn collect_completions_entry_error_returns_empty() {
        let mut input = LineInput::with_completion("", Completion::DatasetPaths);
        let entries: Vec<std::io::Result<(String, bool)>> = vec![
            Ok(("a.csv".to_string(), false)),
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "mock")),
        ];
        assert!(input.collect_completions(entries.into_iter(), "", "").is_empty());
        assert!(input.completion_error);
    }

    #[test]
    fn collect_completions_capped_at_100() {
        let mut input = LineInput::with_completion("", Completion::DatasetPaths);
        let entries: Vec<std::io::Result<(String, bool)>> = (0..200)
            .map(|i| Ok((format!("set_{i:03}.csv"), false)))
            .collect();
        assert_eq!(input.collect_completions(entries.into_iter(), "", "").len(), 100);
    }
}
