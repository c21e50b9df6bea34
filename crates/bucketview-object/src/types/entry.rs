//! Listing entry types.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Whether an entry is a file or a virtual folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryKind {
    /// A regular object.
    File,
    /// A key prefix ending in `/`.
    Folder,
}

impl EntryKind {
    /// Derives the kind from a key: a trailing `/` denotes a folder.
    pub fn from_key(key: &str) -> Self {
        if key.ends_with('/') {
            Self::Folder
        } else {
            Self::File
        }
    }
}

/// Storage class label reported by the object store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StorageClass {
    #[default]
    Standard,
    ReducedRedundancy,
    StandardIa,
    OnezoneIa,
    IntelligentTiering,
    Glacier,
    DeepArchive,
    /// Any label this crate does not know, kept verbatim.
    Other(String),
}

impl StorageClass {
    /// Returns the wire label of this storage class.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => "STANDARD",
            Self::ReducedRedundancy => "REDUCED_REDUNDANCY",
            Self::StandardIa => "STANDARD_IA",
            Self::OnezoneIa => "ONEZONE_IA",
            Self::IntelligentTiering => "INTELLIGENT_TIERING",
            Self::Glacier => "GLACIER",
            Self::DeepArchive => "DEEP_ARCHIVE",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for StorageClass {
    fn from(label: String) -> Self {
        match label.as_str() {
            "" | "STANDARD" => Self::Standard,
            "REDUCED_REDUNDANCY" => Self::ReducedRedundancy,
            "STANDARD_IA" => Self::StandardIa,
            "ONEZONE_IA" => Self::OnezoneIa,
            "INTELLIGENT_TIERING" => Self::IntelligentTiering,
            "GLACIER" => Self::Glacier,
            "DEEP_ARCHIVE" => Self::DeepArchive,
            _ => Self::Other(label),
        }
    }
}

impl From<StorageClass> for String {
    fn from(class: StorageClass) -> Self {
        class.as_str().to_string()
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One object-storage item in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Key of the object; a trailing `/` denotes a folder.
    pub key: String,
    /// Last modification time as an ISO 8601 string.
    pub last_modified: String,
    /// Size in bytes, zero for folders.
    pub size: u64,
    /// Content fingerprint, empty for folders.
    pub etag: String,
    /// Storage class label.
    pub storage_class: StorageClass,
    /// Public retrieval URL.
    pub url: String,
    /// File or folder, derived from the key.
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Entry {
    /// Creates a file entry.
    pub fn file(
        key: impl Into<String>,
        last_modified: impl Into<String>,
        size: u64,
        etag: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let key = key.into();
        Self {
            kind: EntryKind::from_key(&key),
            key,
            last_modified: last_modified.into(),
            size,
            etag: etag.into(),
            storage_class: StorageClass::Standard,
            url: url.into(),
        }
    }

    /// Creates a folder entry with zero size and an empty etag.
    pub fn folder(
        key: impl Into<String>,
        last_modified: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            last_modified: last_modified.into(),
            size: 0,
            etag: String::new(),
            storage_class: StorageClass::Standard,
            url: url.into(),
            kind: EntryKind::Folder,
        }
    }

    /// Sets the storage class.
    #[must_use]
    pub fn with_storage_class(mut self, storage_class: StorageClass) -> Self {
        self.storage_class = storage_class;
        self
    }

    /// Returns whether this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Returns the last path segment, keeping a folder's trailing `/`.
    pub fn name(&self) -> &str {
        let trimmed = self.key.trim_end_matches('/');
        let start = trimmed.rfind('/').map_or(0, |i| i + 1);
        &self.key[start..]
    }
}
