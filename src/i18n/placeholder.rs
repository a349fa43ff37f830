//! Positional placeholder handling (`%1` .. `%9`).
//!
//! A placeholder is a `%` immediately followed by a single digit `1`-`9`.
//! Substitution is driven by the digit, not by the order tokens appear in,
//! so translators may reorder `%1`/`%2` freely. Anything else after a `%`
//! is literal text.

/// Highest placeholder position a token can reference.
pub const MAX_POSITION: u8 = 9;

/// Set of placeholder positions used by a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderSet(u16);

impl PlaceholderSet {
    /// Empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a position (1-9). Out-of-range positions are ignored.
    pub fn insert(&mut self, position: u8) {
        if (1..=MAX_POSITION).contains(&position) {
            self.0 |= 1 << position;
        }
    }

    /// Whether a position is in the set.
    pub fn contains(&self, position: u8) -> bool {
        (1..=MAX_POSITION).contains(&position) && self.0 & (1 << position) != 0
    }

    /// Whether every position in `self` is also in `other`.
    pub fn is_subset(&self, other: &PlaceholderSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Highest position in the set, 0 when empty.
    pub fn max_position(&self) -> u8 {
        (1..=MAX_POSITION)
            .rev()
            .find(|p| self.contains(*p))
            .unwrap_or(0)
    }

    /// Positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=MAX_POSITION).filter(move |p| self.contains(*p))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Collect the placeholder positions used by `text`.
///
/// Returns `Err(token)` for a `%0` token, which would reference an argument
/// before the first one.
pub fn scan_placeholders(text: &str) -> Result<PlaceholderSet, String> {
    let mut set = PlaceholderSet::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit() {
            let position = bytes[i + 1] - b'0';
            if position == 0 {
                return Err("%0".to_string());
            }
            set.insert(position);
            i += 2;
        } else {
            i += 1;
        }
    }

    Ok(set)
}

/// Result of substituting arguments into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Output text
    pub text: String,
    /// Positions that had no matching argument and were left as literal tokens
    pub unfilled: Vec<u8>,
}

impl Substitution {
    /// Whether every placeholder found an argument.
    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty()
    }
}

/// Substitute `args` into the `%N` tokens of `template`.
///
/// `%N` takes `args[N-1]`. A token without an argument stays in the output
/// verbatim and its position is reported in [`Substitution::unfilled`].
pub fn substitute<S: AsRef<str>>(template: &str, args: &[S]) -> Substitution {
    let mut text = String::with_capacity(template.len());
    let mut unfilled = Vec::new();
    let mut rest = template;

    while let Some(idx) = rest.find('%') {
        text.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        match after.as_bytes().first() {
            Some(d) if (b'1'..=b'9').contains(d) => {
                let position = d - b'0';
                match args.get(usize::from(position) - 1) {
                    Some(arg) => text.push_str(arg.as_ref()),
                    None => {
                        text.push('%');
                        text.push(char::from(*d));
                        if !unfilled.contains(&position) {
                            unfilled.push(position);
                        }
                    }
                }
                rest = &after[1..];
            }
            _ => {
                text.push('%');
                rest = after;
            }
        }
    }
    text.push_str(rest);

    Substitution { text, unfilled }
}
