use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::policy::RevealToggles;
use crate::tts::google::DEFAULT_ENDPOINT;

pub const LOCALES: &[&str] = &["en", "ko"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_show_punctuation")]
    pub show_punctuation: bool,
    #[serde(default = "default_show_numbers")]
    pub show_numbers: bool,
    #[serde(default)]
    pub hide_all: bool,
    #[serde(default = "default_tts_enabled")]
    pub tts_enabled: bool,
    #[serde(default = "default_tts_language")]
    pub tts_language: String,
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,
    #[serde(default = "default_audio_player")]
    pub audio_player: String,
    #[serde(default)]
    pub last_dataset: Option<String>,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_show_punctuation() -> bool {
    true
}
fn default_show_numbers() -> bool {
    true
}
fn default_tts_enabled() -> bool {
    true
}
fn default_tts_language() -> String {
    "en".to_string()
}
fn default_tts_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_audio_player() -> String {
    if cfg!(target_os = "macos") {
        "afplay".to_string()
    } else {
        "mpv --no-video --really-quiet".to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            locale: default_locale(),
            show_punctuation: default_show_punctuation(),
            show_numbers: default_show_numbers(),
            hide_all: false,
            tts_enabled: default_tts_enabled(),
            tts_language: default_tts_language(),
            tts_endpoint: default_tts_endpoint(),
            audio_player: default_audio_player(),
            last_dataset: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dictr")
            .join("config.toml")
    }

    /// Reset values that no longer name anything we ship.
    pub fn validate(&mut self, valid_themes: &[String]) {
        if !LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        if !valid_themes.is_empty() && !valid_themes.contains(&self.theme) {
            self.theme = default_theme();
        }
        if self.tts_language.trim().is_empty() {
            self.tts_language = default_tts_language();
        }
        if self.tts_endpoint.trim().is_empty() {
            self.tts_endpoint = default_tts_endpoint();
        }
    }

    /// Starting checkboxes for a new session.
    pub fn reveal_toggles(&self) -> RevealToggles {
        let mut toggles = RevealToggles {
            show_punctuation: self.show_punctuation,
            show_numbers: self.show_numbers,
            ..RevealToggles::default()
        };
        if self.hide_all {
            toggles.toggle_hide_all();
        }
        toggles
    }
}
