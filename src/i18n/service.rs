//! Translation service: the engine facade handed to UI code.

use std::sync::Arc;

use crossbeam::channel::Receiver;

use crate::config::I18nConfig;
use crate::i18n::catalog::Catalog;
use crate::i18n::controller::{LocaleChanged, LocaleController, ObserverId};
use crate::i18n::detect::{LocaleDetector, SystemLocaleDetector};
use crate::i18n::loader::{CatalogSource, DirectorySource, EmbeddedSource, LayeredSource};
use crate::i18n::registry::{LocaleInfo, LocaleRegistry};
use crate::i18n::resolver::{resolve, Origin, Resolution};
use crate::i18n::store::CatalogStore;
use crate::i18n::types::{I18nError, LoadError, Locale, SwitchError};

/// Base language of the bundled catalogs.
pub const BASE_LOCALE: &str = "en_US";

/// Translates UI strings for the active locale and switches locales at runtime.
#[derive(Debug)]
pub struct TranslationService {
    controller: LocaleController,
    log_misses: bool,
}

impl TranslationService {
    /// Create a service over an explicit registry and source.
    pub fn new(
        registry: LocaleRegistry,
        source: impl CatalogSource + 'static,
        initial: &str,
        fallback: Option<&str>,
    ) -> Result<Self, I18nError> {
        let store = CatalogStore::new(Arc::new(registry), source);
        Ok(Self {
            controller: LocaleController::start(store, initial, fallback)?,
            log_misses: false,
        })
    }

    /// Bundled catalogs, English active and as fallback.
    pub fn with_defaults() -> Result<Self, I18nError> {
        Self::new(
            LocaleRegistry::builtin(),
            EmbeddedSource,
            BASE_LOCALE,
            Some(BASE_LOCALE),
        )
    }

    /// Build a service from configuration, detecting the system locale.
    pub fn from_config(config: &I18nConfig) -> Result<Self, I18nError> {
        Self::from_config_with_detector(config, &SystemLocaleDetector)
    }

    /// Build a service from configuration with an explicit locale detector.
    ///
    /// The initial locale is the configured language, else the detected
    /// system locale (when enabled), else the fallback locale. An unset
    /// fallback locale means [`BASE_LOCALE`].
    pub fn from_config_with_detector(
        config: &I18nConfig,
        detector: &dyn LocaleDetector,
    ) -> Result<Self, I18nError> {
        let mut registry = LocaleRegistry::builtin();
        let mut source = LayeredSource::new();

        if let Some(dir) = &config.translations_dir {
            match registry.discover(dir) {
                Ok(added) => tracing::debug!("Discovered {} extra locales in {}", added, dir.display()),
                Err(e) => tracing::warn!("Cannot scan translations directory: {}", e),
            }
            source = source.push(DirectorySource::new(dir));
        }
        source = source.push(EmbeddedSource);

        let tag = config.fallback_locale.as_deref().unwrap_or(BASE_LOCALE);
        let fallback = registry
            .negotiate(tag)
            .map(|l| l.code.clone())
            .ok_or_else(|| I18nError::FallbackUnavailable {
                code: tag.to_string(),
                source: LoadError::UnknownLocale(tag.to_string()),
            })?;

        let initial = initial_locale(&registry, config, detector, &fallback)?;
        tracing::info!("Starting with locale {}", initial);

        let mut service = Self::new(registry, source, &initial, Some(&fallback))?;
        service.log_misses = config.log_misses;
        Ok(service)
    }

    /// Translate `key` in `context`, substituting `args` into `%1`..`%9`.
    ///
    /// Always returns displayable text; see [`TranslationService::translate_checked`]
    /// for how it was obtained.
    pub fn translate(&self, context: &str, key: &str, args: &[&str]) -> String {
        self.translate_checked(context, key, args).text
    }

    /// Translate and report which fallback step was used.
    pub fn translate_checked(&self, context: &str, key: &str, args: &[&str]) -> Resolution {
        let resolution = self.controller.resolve(context, key, args);
        self.report(context, key, args.len(), &resolution);
        resolution
    }

    /// Switch the active locale by exact code.
    pub fn set_locale(&self, code: &str) -> Result<(), SwitchError> {
        self.controller.set_locale(code)
    }

    /// Re-read the active catalog, picking up edits in the translations directory.
    pub fn reload(&self) -> Result<(), SwitchError> {
        self.controller.reload()
    }

    /// Switch to the registered locale best matching a loose tag ("ru", "zh-CN").
    pub fn set_language(&self, tag: &str) -> Result<(), SwitchError> {
        let code = self
            .registry()
            .negotiate(tag)
            .map(|l| l.code.clone())
            .ok_or_else(|| SwitchError::UnknownLocale(tag.to_string()))?;
        self.controller.set_locale(&code)
    }

    /// All available locales in registration order.
    pub fn available_locales(&self) -> Vec<Locale> {
        self.registry().available_locales()
    }

    /// Whether a locale code is registered.
    pub fn has_locale(&self, code: &str) -> bool {
        self.registry().has_locale(code)
    }

    /// Currently active locale.
    pub fn current_locale(&self) -> Locale {
        self.controller.active_locale()
    }

    /// Completion of every available locale. Locales whose catalog fails to
    /// load report 0.
    pub fn locale_info(&self) -> Vec<LocaleInfo> {
        self.registry()
            .available_locales()
            .into_iter()
            .map(|locale| {
                let completion = self
                    .controller
                    .store()
                    .load(&locale.code)
                    .map(|c| c.completion())
                    .unwrap_or(0);
                LocaleInfo { locale, completion }
            })
            .collect()
    }

    /// Register a callback run after every successful switch.
    pub fn on_locale_changed<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&Locale) + Send + Sync + 'static,
    {
        self.controller.on_locale_changed(callback)
    }

    /// Remove a callback registered with [`TranslationService::on_locale_changed`].
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.controller.remove_observer(id)
    }

    /// Channel of locale change events.
    pub fn subscribe(&self) -> Receiver<LocaleChanged> {
        self.controller.subscribe()
    }

    /// Capture the current catalogs for a consistent multi-string render.
    pub fn snapshot(&self) -> TranslationSnapshot {
        TranslationSnapshot {
            active: self.controller.active(),
            fallback: self.controller.fallback().cloned(),
        }
    }

    /// Underlying switch controller.
    pub fn controller(&self) -> &LocaleController {
        &self.controller
    }

    fn registry(&self) -> &LocaleRegistry {
        self.controller.store().registry()
    }

    fn report(&self, context: &str, key: &str, argc: usize, resolution: &Resolution) {
        if !resolution.unfilled.is_empty() {
            tracing::warn!(
                "{}::{:?}: no argument for placeholder(s) {:?} ({} given)",
                context,
                key,
                resolution.unfilled,
                argc
            );
        }

        if self.log_misses {
            match resolution.origin {
                Origin::Active => {}
                Origin::Fallback => {
                    tracing::debug!("{}::{:?} untranslated, using fallback locale", context, key)
                }
                Origin::Key => tracing::debug!("{}::{:?} missing, using source key", context, key),
            }
        }
    }
}

/// Catalogs captured at one instant.
///
/// Every lookup through a snapshot uses the same catalog, even if a switch
/// completes in between.
#[derive(Debug, Clone)]
pub struct TranslationSnapshot {
    active: Arc<Catalog>,
    fallback: Option<Arc<Catalog>>,
}

impl TranslationSnapshot {
    /// Locale of the captured active catalog.
    pub fn locale(&self) -> &Locale {
        self.active.locale()
    }

    /// Translate against the captured catalogs.
    pub fn translate(&self, context: &str, key: &str, args: &[&str]) -> String {
        self.translate_checked(context, key, args).text
    }

    pub fn translate_checked(&self, context: &str, key: &str, args: &[&str]) -> Resolution {
        resolve(&self.active, self.fallback.as_deref(), context, key, args)
    }
}

fn initial_locale(
    registry: &LocaleRegistry,
    config: &I18nConfig,
    detector: &dyn LocaleDetector,
    fallback: &str,
) -> Result<String, I18nError> {
    if let Some(tag) = config.language.as_deref() {
        match registry.negotiate(tag) {
            Some(locale) => return Ok(locale.code.clone()),
            None => tracing::warn!("Configured language {} is not supported", tag),
        }
    }

    if config.detect_system_locale {
        if let Some(locale) = detector.best_match(registry) {
            tracing::debug!("Auto-detected system language: {}", locale.code);
            return Ok(locale.code);
        }
    }

    Ok(fallback.to_string())
}
