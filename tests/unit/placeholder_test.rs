//! Unit tests for placeholder substitution through the catalog pipeline.

use veil_i18n::i18n::resolver::resolve;
use veil_i18n::i18n::{parse_ts, substitute, LoadError, Locale};

fn catalog_with(translation: &str) -> Result<veil_i18n::i18n::Catalog, LoadError> {
    let ts = format!(
        r#"<TS version="2.1" language="ru_RU"><context><name>UpdateDialog</name>
<message><source>Current version: %1</source><translation>{}</translation></message>
<message><source>Copy %1 to %2</source><translation>Куда: %2, что: %1</translation></message>
</context></TS>"#,
        translation
    );
    parse_ts(&ts, &Locale::new("ru_RU", "Русский"))
}

#[test]
fn test_argument_lands_in_its_slot_regardless_of_position() {
    for translation in ["Текущая версия: %1", "%1 - текущая версия", "Версия %1 (текущая)"] {
        let catalog = catalog_with(translation).unwrap();
        let r = resolve(&catalog, None, "UpdateDialog", "Current version: %1", &["2.0"]);
        assert_eq!(r.text, translation.replace("%1", "2.0"));
        assert!(r.unfilled.is_empty());
    }
}

#[test]
fn test_reordered_pair() {
    let catalog = catalog_with("Текущая версия: %1").unwrap();
    let r = resolve(&catalog, None, "UpdateDialog", "Copy %1 to %2", &["a.conf", "/etc"]);
    assert_eq!(r.text, "Куда: /etc, что: a.conf");
}

#[test]
fn test_translation_with_undefined_placeholder_rejected() {
    let err = catalog_with("Текущая версия: %2").unwrap_err();
    assert_eq!(
        err,
        LoadError::PlaceholderOutOfRange {
            context: "UpdateDialog".to_string(),
            key: "Current version: %1".to_string(),
            position: 2,
        }
    );
}

#[test]
fn test_translation_may_drop_placeholder() {
    let catalog = catalog_with("Текущая версия").unwrap();
    let r = resolve(&catalog, None, "UpdateDialog", "Current version: %1", &["2.0"]);
    assert_eq!(r.text, "Текущая версия");
}

#[test]
fn test_extra_arguments_ignored() {
    let out = substitute("Version %1", &["2.0", "unused"]);
    assert_eq!(out.text, "Version 2.0");
    assert!(out.is_complete());
}

#[test]
fn test_argument_text_is_not_rescanned() {
    let out = substitute("%1 / %2", &["%2", "b"]);
    assert_eq!(out.text, "%2 / b");
}
