//! Unit tests for locale registry discovery.

use veil_i18n::i18n::LocaleRegistry;

const UKRAINIAN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TS version="2.1" language="uk_UA">
<context>
    <name>SystemTray</name>
    <message>
        <source>Exit</source>
        <translation>Вихід</translation>
    </message>
</context>
</TS>"#;

#[test]
fn test_discover_adds_new_locales_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("veil_uk.ts"), UKRAINIAN).unwrap();
    std::fs::write(
        dir.path().join("veil_fa.ts"),
        r#"<TS version="2.1" language="fa_IR"></TS>"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a catalog").unwrap();

    let mut registry = LocaleRegistry::builtin();
    let added = registry.discover(dir.path()).unwrap();
    assert_eq!(added, 2);

    let locales = registry.available_locales();
    let codes: Vec<_> = locales.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["en_US", "ru_RU", "zh_CN", "fa_IR", "uk_UA"]);
    assert_eq!(locales[4].display_name, "Українська");
    assert_eq!(registry.get("uk_UA").unwrap().file_stem, "veil_uk");
}

#[test]
fn test_discover_skips_known_and_broken_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("veil_ru.ts"),
        r#"<TS version="2.1" language="ru_RU"></TS>"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.ts"), "<TS version=\"2.1\">").unwrap();

    let mut registry = LocaleRegistry::builtin();
    assert_eq!(registry.discover(dir.path()).unwrap(), 0);
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_discover_unknown_language_uses_code_as_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("veil_eo.ts"),
        r#"<TS version="2.1" language="eo"></TS>"#,
    )
    .unwrap();

    let mut registry = LocaleRegistry::new();
    registry.discover(dir.path()).unwrap();
    assert_eq!(registry.available_locales()[0].display_name, "eo");
}

#[test]
fn test_discover_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = LocaleRegistry::builtin();
    assert!(registry.discover(&dir.path().join("absent")).is_err());
}
