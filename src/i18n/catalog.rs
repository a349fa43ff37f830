//! Immutable per-locale message catalogs.
//!
//! A [`Catalog`] is built once through [`CatalogBuilder`], which enforces the
//! load-time invariants:
//!
//! - `(context, source)` is unique within the catalog
//! - source text is non-empty
//! - every placeholder position is at least 1
//! - a translation only uses placeholder positions its source text defines
//!
//! After `build()` the catalog is never mutated; a locale switch replaces the
//! whole catalog instead.

use std::collections::HashMap;

use crate::i18n::placeholder::scan_placeholders;
use crate::i18n::types::{LoadError, Locale, Message, MessageKey};

/// Messages belonging to one context (dialog/window namespace).
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    messages: Vec<Message>,
    index: HashMap<String, usize>,
}

impl Context {
    fn new(name: String) -> Self {
        Self {
            name,
            messages: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Context name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a message by source text.
    pub fn get(&self, source: &str) -> Option<&Message> {
        self.index.get(source).map(|&i| &self.messages[i])
    }

    /// Messages in declaration order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The full set of translated messages for one locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    version: String,
    contexts: Vec<Context>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Empty catalog for a locale. Every lookup misses.
    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            version: String::new(),
            contexts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Locale this catalog translates into.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Schema version declared by the serialized data.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Look up a message by context and source text.
    pub fn get(&self, context: &str, source: &str) -> Option<&Message> {
        self.context(context).and_then(|c| c.get(source))
    }

    /// Look up a message by composite key.
    pub fn get_key(&self, key: &MessageKey) -> Option<&Message> {
        self.get(&key.context, &key.source)
    }

    /// Non-empty translation for a message, if any.
    pub fn translation(&self, context: &str, source: &str) -> Option<&str> {
        self.get(context, source)
            .filter(|m| m.is_translated())
            .map(|m| m.translation.as_str())
    }

    /// Look up a context by name.
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.index.get(name).map(|&i| &self.contexts[i])
    }

    /// Contexts in declaration order.
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// All message keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = MessageKey> + '_ {
        self.contexts.iter().flat_map(|c| {
            c.messages
                .iter()
                .map(move |m| MessageKey::new(c.name.clone(), m.source.clone()))
        })
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.contexts.iter().map(Context::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of messages with a non-empty translation.
    pub fn translated_count(&self) -> usize {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter())
            .filter(|m| m.is_translated())
            .count()
    }

    /// Percentage (0-100) of messages with a non-empty translation.
    ///
    /// An empty catalog reports 0.
    pub fn completion(&self) -> u8 {
        let total = self.len();
        if total == 0 {
            return 0;
        }
        ((self.translated_count() * 100) / total) as u8
    }
}

/// Incremental, validating constructor for [`Catalog`].
#[derive(Debug)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Start a catalog for a locale.
    pub fn new(locale: Locale) -> Self {
        Self {
            catalog: Catalog::empty(locale),
        }
    }

    /// Record the schema version of the serialized data.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.catalog.version = version.into();
        self
    }

    /// Add a message, validating it against the catalog invariants.
    ///
    /// Repeated context names merge into the existing context.
    pub fn add(
        &mut self,
        context: &str,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) -> Result<&mut Self, LoadError> {
        let source = source.into();
        let translation = translation.into();

        if source.is_empty() {
            return Err(LoadError::EmptySource {
                context: context.to_string(),
            });
        }

        let invalid = |token: String| LoadError::InvalidPlaceholder {
            context: context.to_string(),
            key: source.clone(),
            token,
        };
        let source_set = scan_placeholders(&source).map_err(invalid)?;
        let translation_set = scan_placeholders(&translation).map_err(invalid)?;

        if let Some(position) = translation_set.iter().find(|p| !source_set.contains(*p)) {
            return Err(LoadError::PlaceholderOutOfRange {
                context: context.to_string(),
                key: source,
                position,
            });
        }

        let ctx_idx = match self.catalog.index.get(context) {
            Some(&i) => i,
            None => {
                self.catalog.contexts.push(Context::new(context.to_string()));
                let i = self.catalog.contexts.len() - 1;
                self.catalog.index.insert(context.to_string(), i);
                i
            }
        };
        let ctx = &mut self.catalog.contexts[ctx_idx];

        if ctx.index.contains_key(&source) {
            return Err(LoadError::DuplicateMessage {
                context: context.to_string(),
                key: source,
            });
        }

        ctx.index.insert(source.clone(), ctx.messages.len());
        ctx.messages.push(Message {
            placeholder_count: source_set.max_position(),
            source,
            translation,
        });

        Ok(self)
    }

    /// Finish construction.
    pub fn build(self) -> Catalog {
        self.catalog
    }
}
