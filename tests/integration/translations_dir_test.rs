//! Integration tests for configuration-driven setup with an on-disk
//! translations directory.

use veil_i18n::config::{load_config_from, save_config_to, I18nConfig};
use veil_i18n::i18n::{FixedLocaleDetector, Origin, TranslationService};

use super::init_tracing;

const PARTIAL_RU: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="ru_RU">
<context>
    <name>MainWindow</name>
    <message>
        <source>Connect</source>
        <translation>Соединить</translation>
    </message>
    <message>
        <source>Disconnect</source>
        <translation type="unfinished">Разъединить</translation>
    </message>
</context>
</TS>"#;

const UKRAINIAN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="uk_UA">
<context>
    <name>SystemTray</name>
    <message>
        <source>Exit</source>
        <translation>Вихід</translation>
    </message>
    <message>
        <source>Connect</source>
        <translation></translation>
    </message>
</context>
</TS>"#;

fn setup() -> (tempfile::TempDir, I18nConfig) {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let translations = dir.path().join("translations");
    std::fs::create_dir_all(&translations).unwrap();
    std::fs::write(translations.join("veil_ru.ts"), PARTIAL_RU).unwrap();
    std::fs::write(translations.join("veil_uk.ts"), UKRAINIAN).unwrap();

    let config = I18nConfig {
        language: Some("ru".to_string()),
        translations_dir: Some(translations),
        log_misses: true,
        ..Default::default()
    };
    (dir, config)
}

#[test]
fn test_directory_catalog_overrides_bundled() {
    let (_dir, config) = setup();
    let service =
        TranslationService::from_config_with_detector(&config, &FixedLocaleDetector::default())
            .unwrap();

    assert_eq!(service.current_locale().code, "ru_RU");
    assert_eq!(service.translate("MainWindow", "Connect", &[]), "Соединить");

    let unfinished = service.translate_checked("MainWindow", "Disconnect", &[]);
    assert_eq!(unfinished.text, "Disconnect");
    assert_eq!(unfinished.origin, Origin::Fallback);

    // Not in the directory catalog at all.
    assert_eq!(service.translate("SystemTray", "Exit", &[]), "Exit");
}

#[test]
fn test_discovered_locale_is_switchable() {
    let (_dir, config) = setup();
    let service =
        TranslationService::from_config_with_detector(&config, &FixedLocaleDetector::default())
            .unwrap();

    let codes: Vec<_> = service
        .available_locales()
        .into_iter()
        .map(|l| l.code)
        .collect();
    assert_eq!(codes, vec!["en_US", "ru_RU", "zh_CN", "uk_UA"]);

    service.set_locale("uk_UA").unwrap();
    assert_eq!(service.translate("SystemTray", "Exit", &[]), "Вихід");
    assert_eq!(service.translate("SystemTray", "Connect", &[]), "Connect");

    let info = service.locale_info();
    let uk = info.iter().find(|i| i.locale.code == "uk_UA").unwrap();
    assert_eq!(uk.completion, 50);
}

#[test]
fn test_bundled_locales_still_load_from_embedded() {
    let (_dir, config) = setup();
    let service =
        TranslationService::from_config_with_detector(&config, &FixedLocaleDetector::default())
            .unwrap();

    service.set_locale("zh_CN").unwrap();
    assert_eq!(service.translate("SystemTray", "Exit", &[]), "退出");
}

#[test]
fn test_edited_catalog_picked_up_by_reload() {
    let (_dir, config) = setup();
    let service =
        TranslationService::from_config_with_detector(&config, &FixedLocaleDetector::default())
            .unwrap();
    let translations = config.translations_dir.clone().unwrap();

    std::fs::write(
        translations.join("veil_ru.ts"),
        PARTIAL_RU.replace("Соединить", "Подключить"),
    )
    .unwrap();

    let events = service.subscribe();
    service.reload().unwrap();

    assert_eq!(service.current_locale().code, "ru_RU");
    assert_eq!(service.translate("MainWindow", "Connect", &[]), "Подключить");
    assert_eq!(events.try_iter().count(), 1);
}

#[test]
fn test_config_file_round_trip_drives_service() {
    let (dir, config) = setup();
    let path = dir.path().join("config.toml");
    save_config_to(&path, &config).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, config);

    let service =
        TranslationService::from_config_with_detector(&loaded, &FixedLocaleDetector::default())
            .unwrap();
    assert_eq!(service.current_locale().code, "ru_RU");
}

#[test]
fn test_missing_translations_dir_still_starts() {
    let dir = tempfile::tempdir().unwrap();
    let config = I18nConfig {
        language: Some("zh_CN".to_string()),
        translations_dir: Some(dir.path().join("absent")),
        ..Default::default()
    };
    let service =
        TranslationService::from_config_with_detector(&config, &FixedLocaleDetector::default())
            .unwrap();
    assert_eq!(service.translate("SystemTray", "Exit", &[]), "退出");
}
