pub mod cache;
pub mod google;

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use thiserror::Error;

use crate::tts::cache::AudioCache;

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("speech synthesis is not available in this build")]
    Disabled,

    #[error("nothing to speak")]
    EmptyText,

    #[cfg(feature = "network")]
    #[error("speech request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech service answered HTTP {0}")]
    Status(u16),

    #[error("speech service returned no audio")]
    EmptyAudio,

    #[error("cannot store audio: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot start audio player {program:?}: {source}")]
    Player {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that turns English text into an encoded audio payload.
pub trait SpeechSynthesizer {
    fn language(&self) -> &str;
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}

/// Audio produced for one sentence. Dropped whenever the sentence changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioClip {
    pub index: usize,
    pub path: PathBuf,
}

pub struct Speaker {
    synth: Box<dyn SpeechSynthesizer>,
    cache: AudioCache,
    player: Vec<String>,
    playing: Option<Child>,
}

impl Speaker {
    /// `player` is a command line such as `"mpv --no-video"`; the clip path is
    /// appended as the last argument. Blank means "write the file only".
    pub fn new(synth: Box<dyn SpeechSynthesizer>, cache: AudioCache, player: &str) -> Self {
        Self {
            synth,
            cache,
            player: player.split_whitespace().map(str::to_string).collect(),
            playing: None,
        }
    }

    pub fn has_player(&self) -> bool {
        !self.player.is_empty()
    }

    /// Produce audio for `text`, reusing a cached clip when there is one, and
    /// start playback if a player is configured.
    pub fn speak(&mut self, index: usize, text: &str) -> Result<AudioClip, TtsError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TtsError::EmptyText);
        }
        let lang = self.synth.language().to_string();

        let path = match self.cache.get(&lang, text) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "audio cache hit");
                path
            }
            None => {
                let audio = self.synth.synthesize(text)?;
                if audio.is_empty() {
                    return Err(TtsError::EmptyAudio);
                }
                self.cache.put(&lang, text, &audio)?
            }
        };

        self.play(&path)?;
        Ok(AudioClip { index, path })
    }

    fn play(&mut self, path: &Path) -> Result<(), TtsError> {
        self.stop();
        let Some((program, args)) = self.player.split_first() else {
            return Ok(());
        };
        let child = Command::new(program)
            .args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| TtsError::Player {
                program: program.clone(),
                source,
            })?;
        self.playing = Some(child);
        Ok(())
    }

    /// Kill playback that is still running, if any.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.playing.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.stop();
    }
}
