//! One recorded content access: which store, which channel, which path.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StoreKey;

/// Ingress/egress classification for an access event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessChannel {
    /// Direct access through the package type's native API.
    Native,
    /// Access relayed through the generic HTTP proxy.
    GenericProxy,
}

impl fmt::Display for AccessChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str("NATIVE"),
            Self::GenericProxy => f.write_str("GENERIC_PROXY"),
        }
    }
}

/// Immutable access record.
///
/// Equality, hashing and ordering are structural over the store key, the
/// access channel and the path, so equal accesses collapse inside a set.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
///
/// use tracking_backend::domain::{AccessChannel, ContentEntry, StoreKey};
///
/// let store: StoreKey = "maven:remote:central".parse().expect("valid key");
/// let entry = ContentEntry::new(store, AccessChannel::Native, "/org/foo/1.0/foo-1.0.pom");
///
/// let set: HashSet<_> = [entry.clone(), entry].into_iter().collect();
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    store_key: StoreKey,
    access_channel: AccessChannel,
    path: String,
}

impl ContentEntry {
    /// Construct an entry for one access.
    pub fn new(store_key: StoreKey, access_channel: AccessChannel, path: impl Into<String>) -> Self {
        Self {
            store_key,
            access_channel,
            path: path.into(),
        }
    }

    /// Store the content was read from or written to.
    pub const fn store_key(&self) -> &StoreKey {
        &self.store_key
    }

    /// Channel the access arrived through.
    pub const fn access_channel(&self) -> AccessChannel {
        self.access_channel
    }

    /// Repository-relative path of the content.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

impl fmt::Display for ContentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} ({})", self.store_key, self.path, self.access_channel)
    }
}
