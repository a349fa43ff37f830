//! VEIL i18n - Localization engine for the VEIL VPN desktop client
//!
//! Loads per-locale Qt Linguist message catalogs, resolves `(context, key)`
//! lookups with fallback to the base language, substitutes positional
//! arguments, and switches the active locale at runtime without blocking
//! readers.

pub mod config;
pub mod i18n;

// Re-export commonly used types
pub use config::I18nConfig;
pub use i18n::{Locale, LoadError, SwitchError, TranslationService};
