//! Context tags

use std::fmt;

/// A tag attached to a logging context.
///
/// An empty `value` makes this a bare tag, rendered as just the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn bare(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: String::new(),
        }
    }

    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn is_bare(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bare() {
            f.write_str(&self.key)
        } else {
            write!(f, "{}={}", self.key, self.value)
        }
    }
}

impl From<&str> for Tag {
    fn from(key: &str) -> Self {
        Tag::bare(key)
    }
}

impl From<(&str, &str)> for Tag {
    fn from((key, value): (&str, &str)) -> Self {
        Tag::pair(key, value)
    }
}
