//! Translation lookup with fallback and placeholder substitution.
//!
//! Fallback chain: active catalog -> fallback catalog -> the source key
//! itself. An empty translation counts as a miss at every step.

use crate::i18n::catalog::Catalog;
use crate::i18n::placeholder::substitute;

/// Which step of the fallback chain produced a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Active locale's translation
    Active,
    /// Fallback locale's translation
    Fallback,
    /// Raw source key
    Key,
}

/// A resolved, substituted string plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Display text
    pub text: String,
    /// Step of the fallback chain that supplied the template
    pub origin: Origin,
    /// Placeholder positions left unfilled for lack of arguments
    pub unfilled: Vec<u8>,
}

impl Resolution {
    /// Whether the active locale supplied the text.
    pub fn is_translated(&self) -> bool {
        self.origin == Origin::Active
    }
}

/// Pick the template for `(context, key)` without substituting.
pub fn select<'a>(
    active: &'a Catalog,
    fallback: Option<&'a Catalog>,
    context: &str,
    key: &'a str,
) -> (&'a str, Origin) {
    if let Some(text) = active.translation(context, key) {
        return (text, Origin::Active);
    }

    if let Some(text) = fallback.and_then(|f| f.translation(context, key)) {
        return (text, Origin::Fallback);
    }

    (key, Origin::Key)
}

/// Resolve `(context, key)` and substitute `args` into the result.
///
/// Never fails: a missing translation degrades to the fallback locale, then
/// to `key`; a placeholder without an argument stays as a literal token.
pub fn resolve<S: AsRef<str>>(
    active: &Catalog,
    fallback: Option<&Catalog>,
    context: &str,
    key: &str,
    args: &[S],
) -> Resolution {
    let (template, origin) = select(active, fallback, context, key);
    let substitution = substitute(template, args);

    Resolution {
        text: substitution.text,
        origin,
        unfilled: substitution.unfilled,
    }
}
