//! Catalog store: loads, validates and caches catalogs by locale code.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::i18n::catalog::Catalog;
use crate::i18n::loader::CatalogSource;
use crate::i18n::parser_ts::parse_ts;
use crate::i18n::registry::LocaleRegistry;
use crate::i18n::types::LoadError;

/// Loads catalogs for registered locales and keeps them for reuse.
///
/// Only successfully validated catalogs are cached; a failed load is retried
/// from the source on the next request.
pub struct CatalogStore {
    registry: Arc<LocaleRegistry>,
    source: Box<dyn CatalogSource>,
    cache: RwLock<HashMap<String, Arc<Catalog>>>,
}

impl CatalogStore {
    /// Create a store reading from `source`.
    pub fn new(registry: Arc<LocaleRegistry>, source: impl CatalogSource + 'static) -> Self {
        Self {
            registry,
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Registry this store resolves locale codes against.
    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Load the catalog for a registered locale code.
    pub fn load(&self, code: &str) -> Result<Arc<Catalog>, LoadError> {
        if let Some(catalog) = self.cached(code) {
            tracing::debug!("Catalog cache hit for {}", code);
            return Ok(catalog);
        }

        let entry = self
            .registry
            .get(code)
            .ok_or_else(|| LoadError::UnknownLocale(code.to_string()))?;

        let content = self.source.read(entry)?;
        let catalog = Arc::new(parse_ts(&content, &entry.locale)?);

        tracing::info!(
            "Loaded catalog {} ({} messages, {}% translated) from {}",
            code,
            catalog.len(),
            catalog.completion(),
            self.source.describe()
        );

        // A concurrent load of the same code may have finished first; keep
        // whichever landed in the cache so every caller shares one Arc.
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(cache.entry(code.to_string()).or_insert(catalog).clone())
    }

    /// Cached catalog for a code, without loading.
    pub fn cached(&self, code: &str) -> Option<Arc<Catalog>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code)
            .cloned()
    }

    /// Drop a cached catalog so the next load re-reads the source.
    ///
    /// Holders of the old `Arc` keep using it until they release it.
    pub fn invalidate(&self, code: &str) -> bool {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(code)
            .is_some()
    }

    /// Drop every cached catalog.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("source", &self.source.describe())
            .field("locales", &self.registry.len())
            .finish()
    }
}
