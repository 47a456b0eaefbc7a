use std::time::Duration;

use crate::tts::{SpeechSynthesizer, TtsError};

pub const DEFAULT_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// The endpoint rejects longer `q` parameters.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Client for the translate_tts endpoint. Responses are MP3 and can be
/// concatenated chunk after chunk.
pub struct GoogleTts {
    endpoint: String,
    lang: String,
    timeout: Duration,
}

impl GoogleTts {
    pub fn new(endpoint: &str, lang: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            lang: lang.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    #[cfg(feature = "network")]
    fn fetch_all(&self, chunks: &[String]) -> Result<Vec<u8>, TtsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let response = client
                .get(&self.endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("q", chunk.as_str()),
                    ("tl", self.lang.as_str()),
                    ("client", "tw-ob"),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()?;
            let status = response.status();
            if !status.is_success() {
                return Err(TtsError::Status(status.as_u16()));
            }
            audio.extend_from_slice(&response.bytes()?);
        }
        Ok(audio)
    }

    #[cfg(not(feature = "network"))]
    fn fetch_all(&self, _chunks: &[String]) -> Result<Vec<u8>, TtsError> {
        let _ = self.timeout;
        Err(TtsError::Disabled)
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn language(&self) -> &str {
        &self.lang
    }

    fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }
        tracing::debug!(chunks = chunks.len(), lang = %self.lang, "requesting speech");
        let audio = self.fetch_all(&chunks)?;
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(audio)
    }
}

/// Greedy word packing into pieces of at most `max` chars. A single word
/// longer than `max` is cut into `max`-sized pieces.
pub fn chunk_text(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
