//! Key patterns
//!
//! Matchers applied to whole keys by `Store::get_all`.

use regex::Regex;

use crate::error::Result;

/// A matcher over the full key string
#[derive(Debug, Clone)]
pub enum KeyPattern {
    /// Unanchored regular-expression search (use `^`/`$` to anchor)
    Regex(Regex),

    /// Key starts with the given text
    Prefix(String),

    /// Key contains the given text anywhere
    Contains(String),
}

impl KeyPattern {
    /// Compile a regular-expression pattern
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(KeyPattern::Regex(Regex::new(pattern)?))
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        KeyPattern::Prefix(prefix.into())
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        KeyPattern::Contains(needle.into())
    }

    /// Check whether `key` matches this pattern
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Regex(re) => re.is_match(key),
            KeyPattern::Prefix(prefix) => key.starts_with(prefix.as_str()),
            KeyPattern::Contains(needle) => key.contains(needle.as_str()),
        }
    }
}

impl From<Regex> for KeyPattern {
    fn from(re: Regex) -> Self {
        KeyPattern::Regex(re)
    }
}
