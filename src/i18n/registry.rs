//! Registry of available locales and where their catalogs live.

use std::path::Path;

use crate::i18n::parser_ts::parse_ts_header;
use crate::i18n::types::{primary_language, LoadError, Locale};

/// A registered locale and the file stem of its catalog (e.g., `veil_ru`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleEntry {
    pub locale: Locale,
    pub file_stem: String,
}

/// Information about an available locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleInfo {
    pub locale: Locale,
    /// Completion percentage (0-100)
    pub completion: u8,
}

/// Ordered set of locales the engine can switch to.
///
/// Order is registration order and never changes once a locale is added.
#[derive(Debug, Clone, Default)]
pub struct LocaleRegistry {
    entries: Vec<LocaleEntry>,
}

impl LocaleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the catalogs bundled with the client.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Locale::new("en_US", "English"), "veil_en");
        registry.register(Locale::new("ru_RU", "Русский"), "veil_ru");
        registry.register(Locale::new("zh_CN", "中文"), "veil_zh");
        registry
    }

    /// Register a locale. Returns `false` if the code was already registered.
    pub fn register(&mut self, locale: Locale, file_stem: impl Into<String>) -> bool {
        if self.has_locale(&locale.code) {
            return false;
        }
        self.entries.push(LocaleEntry {
            locale,
            file_stem: file_stem.into(),
        });
        true
    }

    /// Register every `*.ts` catalog in `dir` that declares a new locale.
    ///
    /// Files are visited in file-name order. Files whose header cannot be read
    /// are skipped. Returns the number of locales added.
    pub fn discover(&mut self, dir: &Path) -> Result<usize, LoadError> {
        let read_dir = std::fs::read_dir(dir)
            .map_err(|e| LoadError::Io(format!("{}: {}", dir.display(), e)))?;

        let mut files: Vec<_> = read_dir
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "ts"))
            .collect();
        files.sort();

        let mut added = 0;
        for path in files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let header = std::fs::read_to_string(&path)
                .map_err(|e| LoadError::Io(e.to_string()))
                .and_then(|content| parse_ts_header(&content));

            match header {
                Ok(header) => {
                    let name = native_name(primary_language(&header.language))
                        .map(str::to_string)
                        .unwrap_or_else(|| header.language.clone());
                    if self.register(Locale::new(header.language, name), stem) {
                        added += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping catalog {}: {}", path.display(), e);
                }
            }
        }

        Ok(added)
    }

    /// All available locales in registration order.
    pub fn available_locales(&self) -> Vec<Locale> {
        self.entries.iter().map(|e| e.locale.clone()).collect()
    }

    /// Whether a locale code is registered (exact match).
    pub fn has_locale(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Entry for a locale code (exact match).
    pub fn get(&self, code: &str) -> Option<&LocaleEntry> {
        self.entries.iter().find(|e| e.locale.code == code)
    }

    /// Registered entries in registration order.
    pub fn entries(&self) -> &[LocaleEntry] {
        &self.entries
    }

    /// Map a loose language tag (`"ru"`, `"ru-RU"`, `"zh_cn"`) to a registered
    /// locale.
    ///
    /// Tries a full code match first (case-insensitive, `-` and `_`
    /// interchangeable), then the first locale with the same primary language.
    pub fn negotiate(&self, tag: &str) -> Option<&Locale> {
        let normalized = tag.trim().replace('-', "_");
        if normalized.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|e| e.locale.code.eq_ignore_ascii_case(&normalized))
            .or_else(|| {
                let language = primary_language(&normalized);
                self.entries
                    .iter()
                    .find(|e| e.locale.language().eq_ignore_ascii_case(language))
            })
            .map(|e| &e.locale)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Native name for a primary language subtag.
pub fn native_name(language: &str) -> Option<&'static str> {
    let name = match language {
        "en" => "English",
        "ru" => "Русский",
        "zh" => "中文",
        "uk" => "Українська",
        "de" => "Deutsch",
        "fr" => "Français",
        "es" => "Español",
        "it" => "Italiano",
        "pt" => "Português",
        "ja" => "日本語",
        "ko" => "한국어",
        "fa" => "فارسی",
        "tr" => "Türkçe",
        _ => return None,
    };
    Some(name)
}
