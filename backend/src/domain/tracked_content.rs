//! Tracked-content aggregate for one tracking session.
//!
//! The aggregate owns a [`TrackingKey`] plus the upload and download sets
//! recorded during the session. Identity is the key alone: two aggregates
//! with the same key are the same logical record whatever their entries.
//!
//! The persisted and wire shape is `{ key, uploads, downloads }` in that
//! order. A missing or `null` entry collection decodes as an empty set.
//! Entries are emitted sorted so encodings are deterministic; nothing on the
//! decode path depends on that order.
//!
//! The aggregate performs no internal locking. Concurrent appends during a
//! live session must be serialised by the owner.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::{ContentEntry, TrackingKey};

/// Upload and download record for one tracking session.
///
/// # Examples
/// ```
/// use tracking_backend::domain::{AccessChannel, ContentEntry, TrackedContent, TrackingKey};
///
/// let mut content = TrackedContent::new(TrackingKey::new("build-42").expect("valid key"));
/// let entry = ContentEntry::new(
///     "maven:remote:central".parse().expect("valid store"),
///     AccessChannel::Native,
///     "/org/foo/1.0/foo-1.0.jar",
/// );
/// assert!(content.add_download(entry.clone()));
/// assert!(!content.add_download(entry));
/// assert_eq!(content.downloads().len(), 1);
/// assert!(content.uploads().is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TrackedContentDto", into = "TrackedContentDto")]
pub struct TrackedContent {
    key: TrackingKey,
    uploads: HashSet<ContentEntry>,
    downloads: HashSet<ContentEntry>,
}

impl TrackedContent {
    /// Start an empty record for `key`.
    pub fn new(key: TrackingKey) -> Self {
        Self {
            key,
            uploads: HashSet::new(),
            downloads: HashSet::new(),
        }
    }

    /// Build a record from initial entry collections; duplicates collapse.
    pub fn with_entries(
        key: TrackingKey,
        uploads: impl IntoIterator<Item = ContentEntry>,
        downloads: impl IntoIterator<Item = ContentEntry>,
    ) -> Self {
        Self {
            key,
            uploads: uploads.into_iter().collect(),
            downloads: downloads.into_iter().collect(),
        }
    }

    /// Session identity.
    pub const fn key(&self) -> &TrackingKey {
        &self.key
    }

    /// Record an upload. Returns `false` when an equal entry was already present.
    pub fn add_upload(&mut self, entry: ContentEntry) -> bool {
        self.uploads.insert(entry)
    }

    /// Record a download. Returns `false` when an equal entry was already present.
    pub fn add_download(&mut self, entry: ContentEntry) -> bool {
        self.downloads.insert(entry)
    }

    /// Uploads recorded so far, in no particular order.
    pub const fn uploads(&self) -> &HashSet<ContentEntry> {
        &self.uploads
    }

    /// Downloads recorded so far, in no particular order.
    pub const fn downloads(&self) -> &HashSet<ContentEntry> {
        &self.downloads
    }

    /// Whether neither uploads nor downloads have been recorded.
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty() && self.downloads.is_empty()
    }
}

impl PartialEq for TrackedContent {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TrackedContent {}

impl Hash for TrackedContent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Field order here is the encoding order: `key`, `uploads`, `downloads`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrackedContentDto {
    key: TrackingKey,
    #[serde(default)]
    uploads: Option<Vec<ContentEntry>>,
    #[serde(default)]
    downloads: Option<Vec<ContentEntry>>,
}

fn sorted(entries: HashSet<ContentEntry>) -> Vec<ContentEntry> {
    let mut ordered: Vec<_> = entries.into_iter().collect();
    ordered.sort_unstable();
    ordered
}

impl From<TrackedContent> for TrackedContentDto {
    fn from(value: TrackedContent) -> Self {
        Self {
            key: value.key,
            uploads: Some(sorted(value.uploads)),
            downloads: Some(sorted(value.downloads)),
        }
    }
}

impl From<TrackedContentDto> for TrackedContent {
    fn from(value: TrackedContentDto) -> Self {
        let TrackedContentDto {
            key,
            uploads,
            downloads,
        } = value;
        Self::with_entries(
            key,
            uploads.unwrap_or_default(),
            downloads.unwrap_or_default(),
        )
    }
}
