//! System locale detection.

use crate::i18n::registry::LocaleRegistry;
use crate::i18n::types::Locale;

/// Detect the best available locale from the environment.
pub trait LocaleDetector {
    /// Raw system locale tag (e.g., "ru-RU"), if known.
    fn system_locale(&self) -> Option<String>;

    /// Best registered locale for the system locale.
    fn best_match(&self, registry: &LocaleRegistry) -> Option<Locale> {
        let tag = self.system_locale()?;
        let matched = registry.negotiate(&tag).cloned();
        if matched.is_none() {
            tracing::debug!("System locale {} not supported", tag);
        }
        matched
    }
}

/// Default locale detector using sys-locale.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocaleDetector;

impl LocaleDetector for SystemLocaleDetector {
    fn system_locale(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// Detector that reports a fixed tag. Useful for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct FixedLocaleDetector(pub Option<String>);

impl FixedLocaleDetector {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Some(tag.into()))
    }
}

impl LocaleDetector for FixedLocaleDetector {
    fn system_locale(&self) -> Option<String> {
        self.0.clone()
    }
}
