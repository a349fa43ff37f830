//! Integration test for the process-wide translation entry points.
//!
//! This is the only test in the suite that installs the global service.

use veil_i18n::i18n::{self, FixedLocaleDetector, I18nError, TranslationService};
use veil_i18n::{t, I18nConfig};

#[test]
fn test_global_service_lifecycle() {
    let config = I18nConfig {
        language: Some("ru_RU".to_string()),
        ..Default::default()
    };
    let service =
        TranslationService::from_config_with_detector(&config, &FixedLocaleDetector::default())
            .unwrap();

    let global = i18n::install(service).unwrap();
    assert!(i18n::service().is_some());

    assert_eq!(t!("MainWindow", "Connect"), "Подключиться");
    assert_eq!(t!("AboutDialog", "Version %1", "2.0"), "Версия 2.0");

    global.set_locale("zh_CN").unwrap();
    assert_eq!(i18n::t("SystemTray", "Exit"), "退出");
    assert_eq!(
        i18n::t_args("UpdateDialog", "New version: %1", &["2.1"]),
        "新版本：2.1"
    );

    let again = TranslationService::with_defaults().unwrap();
    assert!(matches!(
        i18n::install(again),
        Err(I18nError::AlreadyInitialized)
    ));
    assert_eq!(i18n::t("SystemTray", "Exit"), "退出");
}
