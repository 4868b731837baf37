//! Scope key type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The owner key that decides which records a caller sees and may edit.
///
/// Usually a user id or e-mail address. Unlike [`RecordId`](super::RecordId),
/// a scope key may be empty: an empty scope means "no user chosen yet", and
/// listing under it yields nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Create a scope key, trimming surrounding whitespace.
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().trim().to_string())
    }

    /// The empty scope.
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Returns the scope key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if no scope has been chosen.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ScopeKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ScopeKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<ScopeKey> for String {
    fn from(scope: ScopeKey) -> Self {
        scope.0
    }
}

impl AsRef<str> for ScopeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ScopeKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        assert_eq!(ScopeKey::new("  u1@example.com ").as_str(), "u1@example.com");
    }

    #[test]
    fn blank_is_empty() {
        assert!(ScopeKey::new("   ").is_empty());
        assert!(ScopeKey::none().is_empty());
    }
}
