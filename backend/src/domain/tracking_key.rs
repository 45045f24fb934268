//! Identifier naming one tracking session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`TrackingKey::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingKeyValidationError {
    /// The identifier was empty or whitespace only.
    Empty,
    /// The identifier carried leading or trailing whitespace.
    Untrimmed,
}

impl fmt::Display for TrackingKeyValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "tracking id must not be empty"),
            Self::Untrimmed => {
                write!(f, "tracking id must not have leading or trailing whitespace")
            }
        }
    }
}

impl std::error::Error for TrackingKeyValidationError {}

/// Opaque, immutable tracking-session identifier.
///
/// Serialises as a bare JSON string.
///
/// # Examples
/// ```
/// use tracking_backend::domain::TrackingKey;
///
/// let key = TrackingKey::new("build-42").expect("valid id");
/// assert_eq!(key.id(), "build-42");
/// assert!(TrackingKey::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingKey(String);

impl TrackingKey {
    /// Validate and construct a [`TrackingKey`].
    pub fn new(id: impl Into<String>) -> Result<Self, TrackingKeyValidationError> {
        Self::from_owned(id.into())
    }

    fn from_owned(id: String) -> Result<Self, TrackingKeyValidationError> {
        if id.trim().is_empty() {
            return Err(TrackingKeyValidationError::Empty);
        }
        if id.trim() != id {
            return Err(TrackingKeyValidationError::Untrimmed);
        }
        Ok(Self(id))
    }

    /// Raw session identifier.
    pub fn id(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for TrackingKey {
    fn as_ref(&self) -> &str {
        self.id()
    }
}

impl fmt::Display for TrackingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TrackingKey> for String {
    fn from(value: TrackingKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for TrackingKey {
    type Error = TrackingKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

impl TryFrom<&str> for TrackingKey {
    type Error = TrackingKeyValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", TrackingKeyValidationError::Empty)]
    #[case("   ", TrackingKeyValidationError::Empty)]
    #[case(" build-42", TrackingKeyValidationError::Untrimmed)]
    #[case("build-42\n", TrackingKeyValidationError::Untrimmed)]
    fn rejects_invalid_ids(#[case] raw: &str, #[case] expected: TrackingKeyValidationError) {
        assert_eq!(TrackingKey::new(raw), Err(expected));
    }

    #[rstest]
    fn serialises_as_bare_string() {
        let key = TrackingKey::new("build-42").expect("valid id");
        let json = serde_json::to_string(&key).expect("serialise key");
        assert_eq!(json, "\"build-42\"");

        let decoded: TrackingKey = serde_json::from_str(&json).expect("deserialise key");
        assert_eq!(decoded, key);
    }

    #[rstest]
    fn deserialisation_validates() {
        let result = serde_json::from_str::<TrackingKey>("\"\"");
        assert!(result.is_err(), "empty ids must not deserialise");
    }

    #[rstest]
    fn equal_ids_hash_equal() {
        use std::collections::HashSet;

        let set: HashSet<TrackingKey> = ["a", "a", "b"]
            .into_iter()
            .map(|raw| TrackingKey::new(raw).expect("valid id"))
            .collect();
        assert_eq!(set.len(), 2);
    }
}
