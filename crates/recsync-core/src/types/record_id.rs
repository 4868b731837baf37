//! Record id type.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ValidationError};

/// An opaque record identifier.
///
/// Ids are assigned by the server on creation or reserved up front through
/// the "new id" endpoint. They travel as a URL path segment, so they must be
/// non-empty, may not contain `/` or whitespace, and may not be a dot
/// segment (`.` or `..`).
///
/// Deserializes from a JSON string or an integer.
///
/// # Example
///
/// ```
/// use recsync_core::RecordId;
///
/// let id = RecordId::new("AB3K-9XQ2").unwrap();
/// assert_eq!(id.as_str(), "AB3K-9XQ2");
/// assert!(RecordId::new("a/b").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new record id, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, too long, a dot segment, or
    /// contains `/` or whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        let reason = if s.is_empty() {
            "cannot be empty".to_string()
        } else if s.len() > 256 {
            "exceeds maximum length of 256 characters".to_string()
        } else if s == "." || s == ".." {
            "cannot be a dot segment".to_string()
        } else if let Some(c) = s.chars().find(|c| *c == '/' || c.is_whitespace()) {
            format!("contains invalid character {:?}", c)
        } else {
            return Ok(());
        };

        Err(ValidationError::InvalidId {
            value: s.to_string(),
            reason,
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a record id string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
                RecordId::new(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
                RecordId::new(v.to_string()).map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
                RecordId::new(v.to_string()).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
