use std::path::Path;
use std::time::{Duration, Instant};

use rust_i18n::t;

use crate::config::{Config, LOCALES};
use crate::dataset::Dataset;
use crate::engine::policy::RevealToggles;
use crate::session::{DictationSession, LoadOutcome};
use crate::tts::cache::AudioCache;
use crate::tts::google::GoogleTts;
use crate::tts::{AudioClip, Speaker};
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::components::session_sidebar::AudioState;
use crate::ui::line_input::{Completion, LineInput};
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    OpenDataset,
    Dictation,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub at: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    Theme,
    Locale,
    ShowPunctuation,
    ShowNumbers,
    HideAll,
    Tts,
}

impl SettingsField {
    pub const ALL: [SettingsField; 6] = [
        SettingsField::Theme,
        SettingsField::Locale,
        SettingsField::ShowPunctuation,
        SettingsField::ShowNumbers,
        SettingsField::HideAll,
        SettingsField::Tts,
    ];
}

pub struct App {
    pub screen: AppScreen,
    pub session: Option<DictationSession>,
    pub answer: LineInput,
    pub path_input: LineInput,
    pub status: Option<StatusMessage>,
    pub audio: Option<AudioClip>,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub settings_selected: usize,
    pub should_quit: bool,
    /// Toggles a freshly loaded dataset starts with.
    pub default_toggles: RevealToggles,
    speaker: Option<Speaker>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);
        rust_i18n::set_locale(&config.locale);
        let speaker = build_speaker(&config);
        let default_toggles = config.reveal_toggles();

        Self {
            screen: AppScreen::Menu,
            session: None,
            answer: LineInput::new(""),
            path_input: LineInput::with_completion("", Completion::DatasetPaths),
            status: None,
            audio: None,
            menu,
            theme,
            config,
            settings_selected: 0,
            should_quit: false,
            default_toggles,
            speaker,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        let theme: &'static Theme = Box::leak(Box::new(theme));
        self.theme = theme;
        self.menu.theme = theme;
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
            at: Instant::now(),
        });
    }

    /// Expire the status line. Errors stay until the next message.
    pub fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.kind != StatusKind::Error
            && status.at.elapsed() >= STATUS_TTL
        {
            self.status = None;
        }
    }

    // --- navigation between screens ---

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_open_dataset(&mut self) {
        let initial = self.config.last_dataset.clone().unwrap_or_default();
        self.path_input = LineInput::with_completion(&initial, Completion::DatasetPaths);
        self.screen = AppScreen::OpenDataset;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn continue_session(&mut self) {
        if self.session.is_some() {
            self.screen = AppScreen::Dictation;
        } else {
            self.set_status(StatusKind::Info, t!("status.no_dataset"));
        }
    }

    pub fn run_menu_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::OpenDataset => self.go_to_open_dataset(),
            MenuAction::Continue => self.continue_session(),
            MenuAction::Settings => self.go_to_settings(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    // --- dataset ---

    /// Load `path` and start (or keep) a session on it. On failure the
    /// previous session is left as it was.
    pub fn open_dataset(&mut self, path: &Path) -> bool {
        let dataset = match Dataset::load(path) {
            Ok(dataset) => dataset,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "dataset load failed");
                self.set_status(StatusKind::Error, t!("status.load_failed", error = err));
                return false;
            }
        };

        self.install_dataset(dataset);
        self.config.last_dataset = Some(path.display().to_string());
        if let Err(err) = self.config.save() {
            tracing::warn!(%err, "could not save config");
        }
        true
    }

    pub fn install_dataset(&mut self, dataset: Dataset) -> LoadOutcome {
        let name = dataset.id().display_name();
        let count = dataset.len();
        let outcome = if let Some(session) = self.session.as_mut() {
            session.load(dataset)
        } else {
            self.session = Some(DictationSession::new(dataset, self.default_toggles));
            LoadOutcome::Reset
        };

        match outcome {
            LoadOutcome::Reset => {
                self.invalidate_audio();
                self.answer.take();
                self.set_status(StatusKind::Info, t!("status.loaded", count = count, name = &name));
            }
            LoadOutcome::Kept => {
                self.set_status(StatusKind::Info, t!("status.kept", name = &name));
            }
        }

        self.menu.loaded = Some(name);
        self.screen = AppScreen::Dictation;
        outcome
    }

    pub fn submit_path(&mut self) {
        let raw = self.path_input.value().trim().to_string();
        if raw.is_empty() {
            return;
        }
        let expanded = match (raw.strip_prefix('~'), dirs::home_dir()) {
            (Some(rest), Some(home)) => format!("{}{rest}", home.to_string_lossy()),
            _ => raw.clone(),
        };
        self.open_dataset(Path::new(&expanded));
    }

    // --- dictation ---

    pub fn submit_answer(&mut self) {
        let input = self.answer.take();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.submit(&input) {
            return;
        }
        let index = session.current_index();
        if session.is_solved(index) {
            self.set_status(StatusKind::Success, t!("dictation.solved"));
        }
    }

    pub fn request_hint(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.request_hint() {
            self.set_status(StatusKind::Info, t!("status.no_more_hints"));
        }
    }

    pub fn first(&mut self) {
        self.navigate(DictationSession::first);
    }

    pub fn last(&mut self) {
        self.navigate(DictationSession::last);
    }

    pub fn prev(&mut self) {
        self.navigate(DictationSession::prev);
    }

    pub fn next(&mut self) {
        self.navigate(DictationSession::next);
    }

    fn navigate(&mut self, op: fn(&mut DictationSession) -> bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if op(session) {
            self.invalidate_audio();
            self.answer.take();
        }
    }

    pub fn toggle_reveal_all(&mut self) {
        self.update_toggles(RevealToggles::toggle_reveal_all);
    }

    pub fn toggle_hide_all(&mut self) {
        self.update_toggles(RevealToggles::toggle_hide_all);
    }

    pub fn toggle_punctuation(&mut self) {
        self.update_toggles(|t| t.show_punctuation = !t.show_punctuation);
    }

    pub fn toggle_numbers(&mut self) {
        self.update_toggles(|t| t.show_numbers = !t.show_numbers);
    }

    fn update_toggles(&mut self, f: impl FnOnce(&mut RevealToggles)) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let mut toggles = session.toggles();
        f(&mut toggles);
        session.set_toggles(toggles);
    }

    // --- audio ---

    pub fn play_audio(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let index = session.current_index();
        let Some(text) = session.dataset().get(index).map(|e| e.english.clone()) else {
            return;
        };
        let Some(speaker) = self.speaker.as_mut() else {
            self.set_status(StatusKind::Info, t!("status.tts_off"));
            return;
        };

        match speaker.speak(index, &text) {
            Ok(clip) => {
                tracing::debug!(index, path = %clip.path.display(), "playing sentence");
                if !speaker.has_player() {
                    let shown = clip.path.display().to_string();
                    self.set_status(StatusKind::Info, t!("status.audio_saved", path = shown));
                }
                self.audio = Some(clip);
            }
            Err(err) => {
                tracing::warn!(index, %err, "speech failed");
                self.audio = None;
                self.set_status(StatusKind::Error, t!("status.tts_failed", error = err));
            }
        }
    }

    /// Drop the clip for the previous sentence and silence it.
    fn invalidate_audio(&mut self) {
        self.audio = None;
        if let Some(speaker) = self.speaker.as_mut() {
            speaker.stop();
        }
    }

    pub fn audio_state(&self) -> AudioState {
        let current = self.session.as_ref().map(DictationSession::current_index);
        match (&self.speaker, &self.audio) {
            (None, _) => AudioState::Off,
            (Some(_), Some(clip)) if Some(clip.index) == current => AudioState::Ready,
            (Some(_), _) => AudioState::Idle,
        }
    }

    // --- settings ---

    pub fn settings_field(&self) -> SettingsField {
        SettingsField::ALL[self.settings_selected.min(SettingsField::ALL.len() - 1)]
    }

    pub fn settings_up(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    pub fn settings_down(&mut self) {
        if self.settings_selected + 1 < SettingsField::ALL.len() {
            self.settings_selected += 1;
        }
    }

    pub fn settings_value(&self, field: SettingsField) -> String {
        let on_off = |on: bool| {
            if on {
                t!("settings.on").to_string()
            } else {
                t!("settings.off").to_string()
            }
        };
        match field {
            SettingsField::Theme => self.config.theme.clone(),
            SettingsField::Locale => self.config.locale.clone(),
            SettingsField::ShowPunctuation => on_off(self.config.show_punctuation),
            SettingsField::ShowNumbers => on_off(self.config.show_numbers),
            SettingsField::HideAll => on_off(self.config.hide_all),
            SettingsField::Tts => on_off(self.config.tts_enabled),
        }
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_cycle(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_cycle(false);
    }

    fn settings_cycle(&mut self, forward: bool) {
        match self.settings_field() {
            SettingsField::Theme => {
                let themes = Theme::available_themes();
                self.config.theme = cycle(&themes, &self.config.theme, forward);
                if let Some(theme) = Theme::load(&self.config.theme) {
                    self.set_theme(theme);
                }
            }
            SettingsField::Locale => {
                let locales: Vec<String> = LOCALES.iter().map(|l| l.to_string()).collect();
                self.config.locale = cycle(&locales, &self.config.locale, forward);
                rust_i18n::set_locale(&self.config.locale);
            }
            SettingsField::ShowPunctuation => {
                self.config.show_punctuation = !self.config.show_punctuation;
                let on = self.config.show_punctuation;
                self.apply_default(|t| t.show_punctuation = on);
            }
            SettingsField::ShowNumbers => {
                self.config.show_numbers = !self.config.show_numbers;
                let on = self.config.show_numbers;
                self.apply_default(|t| t.show_numbers = on);
            }
            SettingsField::HideAll => {
                self.config.hide_all = !self.config.hide_all;
                let on = self.config.hide_all;
                self.apply_default(|t| {
                    if t.hide_all != on {
                        t.toggle_hide_all();
                    }
                });
            }
            SettingsField::Tts => {
                self.config.tts_enabled = !self.config.tts_enabled;
                self.invalidate_audio();
                self.speaker = build_speaker(&self.config);
            }
        }
    }

    /// A settings change affects new datasets and the running session alike.
    fn apply_default(&mut self, f: impl Fn(&mut RevealToggles)) {
        f(&mut self.default_toggles);
        self.update_toggles(f);
    }

    pub fn save_settings(&mut self) {
        if let Err(err) = self.config.save() {
            tracing::warn!(%err, "could not save config");
            self.set_status(StatusKind::Error, t!("status.save_failed", error = err));
        }
    }
}

fn cycle(options: &[String], current: &str, forward: bool) -> String {
    let Some(first) = options.first() else {
        return current.to_string();
    };
    match options.iter().position(|o| o == current) {
        Some(idx) => {
            let len = options.len();
            let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
            options[next].clone()
        }
        None => first.clone(),
    }
}

fn build_speaker(config: &Config) -> Option<Speaker> {
    if !config.tts_enabled {
        return None;
    }
    let Some(cache) = AudioCache::new() else {
        tracing::warn!("no cache directory, speech disabled");
        return None;
    };
    let synth = GoogleTts::new(&config.tts_endpoint, &config.tts_language);
    Some(Speaker::new(Box::new(synth), cache, &config.audio_player))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_app() -> App {
        let config = Config {
            tts_enabled: false,
            ..Config::default()
        };
        App::new(config)
    }

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    fn with_session(app: &mut App, sentences: &[&str]) {
        let entries = sentences
            .iter()
            .enumerate()
            .map(|(i, s)| crate::dataset::Entry {
                id: i.to_string(),
                english: s.to_string(),
                korean: String::new(),
            })
            .collect();
        let dataset = Dataset::from_entries(crate::dataset::DatasetId::synthetic("t"), entries)
            .unwrap();
        app.session = Some(DictationSession::new(dataset, RevealToggles::default()));
        app.screen = AppScreen::Dictation;
    }

    #[test]
    fn test_submit_answer_clears_input_and_reports_success() {
        let mut app = test_app();
        with_session(&mut app, &["Good morning."]);
        app.answer.set("good morning");
        app.submit_answer();
        assert!(app.answer.is_empty());
        assert!(app.session.as_ref().unwrap().is_solved(0));
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Success);
    }

    #[test]
    fn test_navigation_drops_audio_and_answer() {
        let mut app = test_app();
        with_session(&mut app, &["one", "two"]);
        app.audio = Some(AudioClip {
            index: 0,
            path: "/tmp/x.mp3".into(),
        });
        app.answer.set("half typed");
        app.next();
        assert!(app.audio.is_none());
        assert!(app.answer.is_empty());
        assert_eq!(app.session.as_ref().unwrap().current_index(), 1);
    }

    #[test]
    fn test_blocked_navigation_keeps_answer() {
        let mut app = test_app();
        with_session(&mut app, &["one", "two"]);
        app.answer.set("draft");
        app.prev();
        assert_eq!(app.answer.value(), "draft");
    }

    #[test]
    fn test_toggles_apply_to_current_sentence() {
        let mut app = test_app();
        with_session(&mut app, &["It costs 5 dollars."]);
        app.toggle_reveal_all();
        assert!(app.session.as_ref().unwrap().is_solved(0));
    }

    #[test]
    fn test_open_missing_file_keeps_previous_session() {
        let mut app = test_app();
        with_session(&mut app, &["keep me"]);
        assert!(!app.open_dataset(Path::new("/nonexistent/dictr/zzz.csv")));
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
        assert_eq!(
            app.session.as_ref().unwrap().dataset().get(0).unwrap().english,
            "keep me"
        );
    }

    #[test]
    fn test_reloading_same_file_keeps_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "week1.csv",
            "id,english,korean\n1,Hello there,안녕\n2,Bye now,잘가\n",
        );
        let mut app = test_app();
        assert_eq!(app.install_dataset(Dataset::load(&path).unwrap()), LoadOutcome::Reset);
        assert_eq!(app.screen, AppScreen::Dictation);
        app.answer.set("hello");
        app.submit_answer();

        assert_eq!(app.install_dataset(Dataset::load(&path).unwrap()), LoadOutcome::Kept);
        let masked = &app.session.as_ref().unwrap().state(0).unwrap().masked;
        assert!(masked.starts_with("Hello "));

        let other = write_csv(&dir, "week2.csv", "id,english,korean\n1,Something else,다른\n");
        assert_eq!(app.install_dataset(Dataset::load(&other).unwrap()), LoadOutcome::Reset);
        assert_eq!(app.session.as_ref().unwrap().solved_count(), 0);
        assert_eq!(app.menu.loaded.as_deref(), Some("week2.csv"));
    }

    #[test]
    fn test_play_audio_without_speaker_reports() {
        let mut app = test_app();
        with_session(&mut app, &["Hello"]);
        app.play_audio();
        assert_eq!(app.audio_state(), AudioState::Off);
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Info);
    }

    #[test]
    fn test_status_expiry_spares_errors() {
        let mut app = test_app();
        app.set_status(StatusKind::Info, "hi");
        app.status.as_mut().unwrap().at = Instant::now() - STATUS_TTL;
        app.tick();
        assert!(app.status.is_none());

        app.set_status(StatusKind::Error, "bad");
        app.status.as_mut().unwrap().at = Instant::now() - STATUS_TTL;
        app.tick();
        assert!(app.status.is_some());
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let opts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(cycle(&opts, "c", true), "a");
        assert_eq!(cycle(&opts, "a", false), "c");
        assert_eq!(cycle(&opts, "zzz", true), "a");
    }

    #[test]
    fn test_settings_hide_all_reaches_session() {
        let mut app = test_app();
        with_session(&mut app, &["a, b"]);
        app.settings_selected = SettingsField::ALL
            .iter()
            .position(|f| *f == SettingsField::HideAll)
            .unwrap();
        app.settings_cycle_forward();
        assert!(app.config.hide_all);
        assert!(app.session.as_ref().unwrap().toggles().hide_all);
    }
}
