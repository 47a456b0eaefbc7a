pub mod dictation;
pub mod navigator;
pub mod sentence;

pub use dictation::{DictationSession, LoadOutcome, SessionView};
