//! Internationalization module for the desktop client.
//!
//! Catalogs are Qt Linguist `.ts` documents (English, Russian and Chinese are
//! bundled). Strings are looked up by `(context, source text)`, fall back to
//! the base language and then to the source text itself, and take positional
//! `%1`..`%9` arguments. The active locale can be switched at runtime while
//! other threads keep translating.
//!
//! ```no_run
//! use veil_i18n::i18n::TranslationService;
//!
//! let service = TranslationService::with_defaults()?;
//! service.set_locale("zh_CN")?;
//! assert_eq!(service.translate("UpdateDialog", "Current version: %1", &["2.0"]), "当前版本：2.0");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod controller;
pub mod detect;
pub mod loader;
pub mod parser_ts;
pub mod placeholder;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod store;
pub mod types;

use std::sync::OnceLock;

use crate::config::I18nConfig;

// Re-export types
pub use catalog::{Catalog, CatalogBuilder, Context};
pub use controller::{LocaleChanged, LocaleController, ObserverId, SwitchState};
pub use detect::{FixedLocaleDetector, LocaleDetector, SystemLocaleDetector};
pub use loader::{CatalogSource, DirectorySource, EmbeddedSource, LayeredSource, MemorySource};
pub use parser_ts::{parse_ts, parse_ts_file, parse_ts_header, TsHeader};
pub use placeholder::{scan_placeholders, substitute, PlaceholderSet, Substitution};
pub use registry::{LocaleEntry, LocaleInfo, LocaleRegistry};
pub use resolver::{Origin, Resolution};
pub use service::{TranslationService, TranslationSnapshot, BASE_LOCALE};
pub use store::CatalogStore;
pub use types::{I18nError, LoadError, Locale, Message, MessageKey, SwitchError};

/// Global translation service.
static SERVICE: OnceLock<TranslationService> = OnceLock::new();

/// Initialize the process-wide translation service from configuration.
pub fn init(config: &I18nConfig) -> Result<&'static TranslationService, I18nError> {
    install(TranslationService::from_config(config)?)
}

/// Install an already built service as the process-wide one.
pub fn install(service: TranslationService) -> Result<&'static TranslationService, I18nError> {
    SERVICE
        .set(service)
        .map_err(|_| I18nError::AlreadyInitialized)?;
    SERVICE.get().ok_or(I18nError::AlreadyInitialized)
}

/// The process-wide service, if initialized.
pub fn service() -> Option<&'static TranslationService> {
    SERVICE.get()
}

/// Translate a message through the process-wide service.
pub fn t(context: &str, key: &str) -> String {
    t_args(context, key, &[])
}

/// Translate a message with positional arguments.
///
/// Before [`init`] this returns `key` with the arguments substituted.
pub fn t_args(context: &str, key: &str, args: &[&str]) -> String {
    match SERVICE.get() {
        Some(service) => service.translate(context, key, args),
        None => substitute(key, args).text,
    }
}

/// Macro for convenient translation.
///
/// ```no_run
/// use veil_i18n::t;
///
/// let label = t!("MainWindow", "Connect");
/// let version = t!("AboutDialog", "Version %1", "2.0");
/// ```
#[macro_export]
macro_rules! t {
    ($context:expr, $key:expr) => {
        $crate::i18n::t($context, $key)
    };
    ($context:expr, $key:expr, $($arg:expr),+ $(,)?) => {{
        let args = [$($arg.to_string()),+];
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        $crate::i18n::t_args($context, $key, &refs)
    }};
}
