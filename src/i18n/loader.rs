//! Catalog sources: where serialized catalog data comes from.
//!
//! A source only fetches text for a registry entry; parsing and validation
//! happen in the catalog store. Sources report `LoadError::NotFound` when
//! they have nothing for an entry so a [`LayeredSource`] can move on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::i18n::registry::LocaleEntry;
use crate::i18n::types::LoadError;

/// Provides serialized catalog data for registered locales.
pub trait CatalogSource: Send + Sync {
    /// Read the serialized catalog for an entry.
    fn read(&self, entry: &LocaleEntry) -> Result<String, LoadError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Catalogs compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedSource;

impl EmbeddedSource {
    /// Bundled catalog text for a file stem.
    pub fn content(file_stem: &str) -> Option<&'static str> {
        match file_stem {
            "veil_en" => Some(include_str!("translations/veil_en.ts")),
            "veil_ru" => Some(include_str!("translations/veil_ru.ts")),
            "veil_zh" => Some(include_str!("translations/veil_zh.ts")),
            _ => None,
        }
    }
}

impl CatalogSource for EmbeddedSource {
    fn read(&self, entry: &LocaleEntry) -> Result<String, LoadError> {
        Self::content(&entry.file_stem)
            .map(str::to_string)
            .ok_or_else(|| LoadError::NotFound(entry.locale.code.clone()))
    }

    fn describe(&self) -> String {
        "embedded".to_string()
    }
}

/// Catalogs stored as `<dir>/<file_stem>.ts`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory searched by this source.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the catalog file for an entry.
    pub fn path_for(&self, entry: &LocaleEntry) -> PathBuf {
        self.dir.join(format!("{}.ts", entry.file_stem))
    }
}

impl CatalogSource for DirectorySource {
    fn read(&self, entry: &LocaleEntry) -> Result<String, LoadError> {
        let path = self.path_for(entry);
        if !path.is_file() {
            return Err(LoadError::NotFound(entry.locale.code.clone()));
        }

        std::fs::read_to_string(&path)
            .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// In-memory catalogs keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    catalogs: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the catalog text for a file stem.
    pub fn insert(&mut self, file_stem: impl Into<String>, content: impl Into<String>) {
        self.catalogs.insert(file_stem.into(), content.into());
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with(mut self, file_stem: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(file_stem, content);
        self
    }
}

impl CatalogSource for MemorySource {
    fn read(&self, entry: &LocaleEntry) -> Result<String, LoadError> {
        self.catalogs
            .get(&entry.file_stem)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(entry.locale.code.clone()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Tries each source in order, skipping those that report `NotFound`.
///
/// Any other error stops the search: a catalog that exists but cannot be
/// read is not silently replaced by a lower-priority one.
#[derive(Default)]
pub struct LayeredSource {
    sources: Vec<Box<dyn CatalogSource>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority source.
    pub fn push(mut self, source: impl CatalogSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl CatalogSource for LayeredSource {
    fn read(&self, entry: &LocaleEntry) -> Result<String, LoadError> {
        for source in &self.sources {
            match source.read(entry) {
                Err(LoadError::NotFound(_)) => continue,
                result => {
                    tracing::debug!(
                        "Catalog {} served by {}",
                        entry.locale.code,
                        source.describe()
                    );
                    return result;
                }
            }
        }
        Err(LoadError::NotFound(entry.locale.code.clone()))
    }

    fn describe(&self) -> String {
        let names: Vec<_> = self.sources.iter().map(|s| s.describe()).collect();
        names.join(" -> ")
    }
}
