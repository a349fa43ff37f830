//! Core i18n types: locales, messages and the error taxonomy.

use serde::{Deserialize, Serialize};

/// A language/region identifier with a human-readable name.
///
/// Identity is the `code` alone; two locales with the same code compare equal
/// even if their display names differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locale {
    /// Locale code (e.g., "en_US", "ru_RU", "zh_CN")
    pub code: String,
    /// Native display name (e.g., "English", "Русский", "中文")
    pub display_name: String,
}

impl Locale {
    /// Create a new locale.
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
        }
    }

    /// Primary language subtag (`"ru"` for `"ru_RU"`).
    pub fn language(&self) -> &str {
        primary_language(&self.code)
    }
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Locale {}

impl std::hash::Hash for Locale {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name, self.code)
    }
}

/// Primary language subtag of a locale code or language tag.
pub(crate) fn primary_language(code: &str) -> &str {
    code.split(['_', '-']).next().unwrap_or(code)
}

/// Composite lookup key for a message within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    /// Context (dialog/window namespace)
    pub context: String,
    /// Canonical source text
    pub source: String,
}

impl MessageKey {
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{:?}", self.context, self.source)
    }
}

/// A single translatable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Canonical (base-language) text, doubles as the lookup key
    pub source: String,
    /// Target-language text; empty means "not yet translated"
    pub translation: String,
    /// Highest placeholder position used by the source text
    pub placeholder_count: u8,
}

impl Message {
    /// Whether a usable translation is present.
    pub fn is_translated(&self) -> bool {
        !self.translation.is_empty()
    }
}

/// Errors that can occur when loading a catalog.
///
/// Any of these is fatal to the load attempt that produced it and to nothing
/// else: a failed catalog is never installed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// Locale is not registered
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// No source could provide catalog data
    #[error("Catalog not found: {0}")]
    NotFound(String),

    /// IO error reading catalog data
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed XML
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Required attribute missing on an element
    #[error("Missing attribute {attribute} on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    /// Catalog schema version is not supported
    #[error("Unsupported catalog version: {0}")]
    UnsupportedVersion(String),

    /// Catalog declares a different locale than the one requested
    #[error("Catalog declares locale {found}, expected {expected}")]
    LocaleMismatch { expected: String, found: String },

    /// Required element missing in a context or message
    #[error("Missing {field} in context {context}")]
    MissingField { context: String, field: String },

    /// Message with an empty source text
    #[error("Empty source text in context {context}")]
    EmptySource { context: String },

    /// Same (context, source) pair declared twice
    #[error("Duplicate message {key:?} in context {context}")]
    DuplicateMessage { context: String, key: String },

    /// Placeholder token with a position below 1
    #[error("Invalid placeholder {token} in {context}::{key:?}")]
    InvalidPlaceholder {
        context: String,
        key: String,
        token: String,
    },

    /// Translation uses a placeholder the source text does not define
    #[error("Placeholder %{position} in {context}::{key:?} is not defined by the source text")]
    PlaceholderOutOfRange {
        context: String,
        key: String,
        position: u8,
    },
}

/// Errors returned by a locale switch request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwitchError {
    /// Requested locale is not registered
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// Catalog for the locale could not be loaded or failed validation
    #[error("Invalid catalog for {code}: {source}")]
    InvalidCatalog {
        code: String,
        #[source]
        source: LoadError,
    },

    /// A locale change callback tried to switch again on the switching thread
    #[error("Switch to {0} requested from a locale change callback")]
    Reentrant(String),
}

/// Errors that can occur while setting up the translation service.
#[derive(Debug, thiserror::Error)]
pub enum I18nError {
    /// Catalog load failed
    #[error("Failed to load translations: {0}")]
    Load(#[from] LoadError),

    /// Locale switch failed
    #[error("Locale switch failed: {0}")]
    Switch(#[from] SwitchError),

    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Configured fallback locale cannot be loaded
    #[error("Fallback locale {code} unavailable: {source}")]
    FallbackUnavailable {
        code: String,
        #[source]
        source: LoadError,
    },

    /// Process-wide service already installed
    #[error("Translation service already initialized")]
    AlreadyInitialized,
}
