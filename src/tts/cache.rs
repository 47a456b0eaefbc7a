use std::fs;
use std::io;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

/// Synthesized audio on disk, one file per (language, text) pair.
pub struct AudioCache {
    base_dir: PathBuf,
}

impl AudioCache {
    pub fn new() -> Option<Self> {
        let base = dirs::cache_dir()?.join("dictr").join("audio");
        Self::with_base_dir(base).ok()
    }

    pub fn with_base_dir(base_dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn path_for(&self, lang: &str, text: &str) -> PathBuf {
        self.base_dir.join(Self::cache_key(lang, text))
    }

    /// Path of a non-empty cached clip, if any.
    pub fn get(&self, lang: &str, text: &str) -> Option<PathBuf> {
        let path = self.path_for(lang, text);
        match fs::metadata(&path) {
            Ok(meta) if meta.len() > 0 => Some(path),
            _ => None,
        }
    }

    pub fn put(&self, lang: &str, text: &str, audio: &[u8]) -> io::Result<PathBuf> {
        let path = self.path_for(lang, text);
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, audio)?;
        fs::rename(&tmp_path, &path)?;
        Ok(path)
    }

    /// Readable prefix of the text plus a hash, so long or similar sentences
    /// never collide.
    fn cache_key(lang: &str, text: &str) -> String {
        let readable: String = text
            .chars()
            .take(40)
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{lang}-{readable}-{}.mp3", content_digest(lang, text))
    }
}

/// First 16 hex chars of the SHA-256 of `lang`, a NUL separator and `text`.
fn content_digest(lang: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(lang.as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_then_get() {
        let dir = TempDir::new().unwrap();
        let cache = AudioCache::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert!(cache.get("en", "Hello there.").is_none());
        let path = cache.put("en", "Hello there.", b"ID3fake").unwrap();
        assert_eq!(cache.get("en", "Hello there."), Some(path.clone()));
        assert_eq!(fs::read(path).unwrap(), b"ID3fake");
    }

    #[test]
    fn test_empty_file_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = AudioCache::with_base_dir(dir.path().to_path_buf()).unwrap();
        cache.put("en", "x", b"").unwrap();
        assert!(cache.get("en", "x").is_none());
    }

    #[test]
    fn test_keys_are_sanitized_and_distinct() {
        let dir = TempDir::new().unwrap();
        let cache = AudioCache::with_base_dir(dir.path().to_path_buf()).unwrap();
        let a = cache.path_for("en", "What's up? / ../etc");
        let b = cache.path_for("en", "What's up? / ../etd");
        let name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
        assert!(name.ends_with(".mp3"));
        assert_ne!(a, b);
        assert_ne!(cache.path_for("en", "hi"), cache.path_for("ko", "hi"));
    }

    #[test]
    fn test_key_ends_with_stable_sha256_digest() {
        let key = AudioCache::cache_key("en", "See you.");
        assert_eq!(key, AudioCache::cache_key("en", "See you."));
        let digest = key
            .strip_prefix("en-See_you_-")
            .and_then(|rest| rest.strip_suffix(".mp3"))
            .unwrap();
        assert_eq!(digest.len(), 16);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, "6c079de4553e0d48");
        assert_ne!(digest, content_digest("ko", "See you."));
    }
}
