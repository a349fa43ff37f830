//! Qt Linguist (.ts) catalog parser.
//!
//! TS files are XML documents with a `<TS version=".." language="..">` root,
//! repeated `<context>` blocks holding a `<name>` and `<message>` entries,
//! and a `<source>`/`<translation>` pair per message:
//!
//! ```xml
//! <TS version="2.1" language="ru_RU">
//! <context>
//!     <name>MainWindow</name>
//!     <message>
//!         <source>Connect</source>
//!         <translation>Подключиться</translation>
//!     </message>
//! </context>
//! </TS>
//! ```
//!
//! Translations marked `type="unfinished"`, `"obsolete"` or `"vanished"` are
//! read as untranslated. Plural (`numerus`) forms are not supported and are
//! read as untranslated as well.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::i18n::catalog::{Catalog, CatalogBuilder};
use crate::i18n::types::{LoadError, Locale};

/// Supported major version of the TS schema.
pub const TS_MAJOR_VERSION: &str = "2";

/// Root element attributes of a TS document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsHeader {
    /// Schema version (e.g., "2.1")
    pub version: String,
    /// Target locale code (e.g., "zh_CN")
    pub language: String,
}

/// Text-bearing element currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ContextName,
    Source,
    Translation,
}

#[derive(Debug, Default)]
struct PendingMessage {
    source: Option<String>,
    translation: String,
    unfinished: bool,
    numerus: bool,
}

/// Read only the root element attributes.
pub fn parse_ts_header(content: &str) -> Result<TsHeader, LoadError> {
    let mut reader = Reader::from_str(content);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"TS" {
                    return read_header(e);
                }
                return Err(LoadError::InvalidXml(format!(
                    "Unexpected root element <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Ok(Event::Eof) => {
                return Err(LoadError::InvalidXml("Missing <TS> root element".to_string()));
            }
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
        buf.clear();
    }
}

/// Parse a TS document into a catalog for `locale`.
///
/// The document's declared language must match `locale.code`.
pub fn parse_ts(content: &str, locale: &Locale) -> Result<Catalog, LoadError> {
    let mut reader = Reader::from_str(content);
    reader.expand_empty_elements(true);

    let mut builder: Option<CatalogBuilder> = None;
    let mut context_name: Option<String> = None;
    let mut pending: Vec<PendingMessage> = Vec::new();
    let mut message: Option<PendingMessage> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                field = None;
                match e.name().as_ref() {
                    b"TS" => {
                        let header = read_header(e)?;
                        check_header(&header, locale)?;
                        builder = Some(CatalogBuilder::new(locale.clone()).version(header.version));
                    }
                    b"context" => {
                        context_name = None;
                        pending.clear();
                    }
                    b"name" if message.is_none() => {
                        field = Some(Field::ContextName);
                        text.clear();
                    }
                    b"message" => {
                        message = Some(PendingMessage {
                            numerus: attribute(e, "numerus")?.as_deref() == Some("yes"),
                            ..Default::default()
                        });
                    }
                    b"source" if message.is_some() => {
                        field = Some(Field::Source);
                        text.clear();
                    }
                    b"translation" => {
                        if let Some(msg) = message.as_mut() {
                            msg.unfinished = matches!(
                                attribute(e, "type")?.as_deref(),
                                Some("unfinished" | "obsolete" | "vanished")
                            );
                            field = Some(Field::Translation);
                            text.clear();
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    let unescaped = e.unescape().map_err(|e| {
                        LoadError::InvalidXml(format!("Failed to unescape text: {}", e))
                    })?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(ref e)) => {
                match (e.name().as_ref(), field) {
                    (b"name", Some(Field::ContextName)) => {
                        context_name = Some(std::mem::take(&mut text));
                    }
                    (b"source", Some(Field::Source)) => {
                        if let Some(msg) = message.as_mut() {
                            msg.source = Some(std::mem::take(&mut text));
                        }
                    }
                    (b"translation", Some(Field::Translation)) => {
                        if let Some(msg) = message.as_mut() {
                            msg.translation = std::mem::take(&mut text);
                        }
                    }
                    (b"message", _) => {
                        if let Some(msg) = message.take() {
                            pending.push(msg);
                        }
                    }
                    (b"context", _) => {
                        let builder = builder.as_mut().ok_or_else(|| {
                            LoadError::InvalidXml("<context> outside of <TS>".to_string())
                        })?;
                        let name = context_name.take().ok_or_else(|| LoadError::MissingField {
                            context: "<unnamed>".to_string(),
                            field: "name".to_string(),
                        })?;
                        for msg in pending.drain(..) {
                            add_message(builder, &name, msg)?;
                        }
                    }
                    _ => {}
                }
                field = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
        buf.clear();
    }

    builder
        .map(CatalogBuilder::build)
        .ok_or_else(|| LoadError::InvalidXml("Missing <TS> root element".to_string()))
}

/// Parse a TS file from disk.
pub fn parse_ts_file(path: &std::path::Path, locale: &Locale) -> Result<Catalog, LoadError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LoadError::Io(format!("{}: {}", path.display(), e)))?;

    parse_ts(&content, locale)
}

fn add_message(
    builder: &mut CatalogBuilder,
    context: &str,
    msg: PendingMessage,
) -> Result<(), LoadError> {
    let source = msg.source.ok_or_else(|| LoadError::MissingField {
        context: context.to_string(),
        field: "source".to_string(),
    })?;

    let translation = if msg.unfinished || msg.numerus {
        String::new()
    } else {
        msg.translation
    };

    builder.add(context, source, translation)?;
    Ok(())
}

fn read_header(event: &BytesStart<'_>) -> Result<TsHeader, LoadError> {
    let missing = |attribute: &str| LoadError::MissingAttribute {
        element: "TS".to_string(),
        attribute: attribute.to_string(),
    };

    Ok(TsHeader {
        version: attribute(event, "version")?.ok_or_else(|| missing("version"))?,
        language: attribute(event, "language")?.ok_or_else(|| missing("language"))?,
    })
}

fn check_header(header: &TsHeader, locale: &Locale) -> Result<(), LoadError> {
    let major = header.version.split('.').next().unwrap_or_default();
    if major != TS_MAJOR_VERSION {
        return Err(LoadError::UnsupportedVersion(header.version.clone()));
    }

    if header.language != locale.code {
        return Err(LoadError::LocaleMismatch {
            expected: locale.code.clone(),
            found: header.language.clone(),
        });
    }

    Ok(())
}

fn attribute(event: &BytesStart<'_>, name: &str) -> Result<Option<String>, LoadError> {
    for attr in event.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(|e| {
                LoadError::InvalidXml(format!("Failed to unescape attribute {}: {}", name, e))
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn xml_error(reader: &Reader<&[u8]>, e: quick_xml::Error) -> LoadError {
    LoadError::InvalidXml(format!(
        "XML parsing error at position {}: {}",
        reader.buffer_position(),
        e
    ))
}
