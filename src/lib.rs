// Library target for benchmarks and integration tests. The binary entry point
// is main.rs, which declares the same module tree.

pub mod app;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod event;
pub mod session;
pub mod tts;
pub mod ui;

rust_i18n::i18n!("locales", fallback = "en");
