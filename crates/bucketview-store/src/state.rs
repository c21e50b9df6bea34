//! Browser state and the views derived from it.

use bucketview_object::{Entry, format_size};
use serde::{Deserialize, Serialize};

/// One step of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Segment name without slashes.
    pub name: String,
    /// Cumulative prefix up to and including this segment, ending in `/`.
    pub path: String,
}

/// Everything the browser shows for one bucket.
///
/// Mutated only through [`BucketStore`](crate::BucketStore); the derived
/// views below are recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserState {
    /// Entries of the last successful load.
    pub entries: Vec<Entry>,
    /// Whether a load is in flight.
    pub loading: bool,
    /// Message of the last failed load.
    pub error: Option<String>,
    /// Case-insensitive filter applied to entry keys.
    pub search_query: String,
    /// Prefix of the last successful load.
    pub current_prefix: String,
}

impl BrowserState {
    /// Entries whose key contains the search query, ignoring case.
    pub fn filtered_entries(&self) -> Vec<Entry> {
        if self.search_query.is_empty() {
            return self.entries.clone();
        }

        let needle = self.search_query.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| entry.key.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Number of loaded entries, ignoring the search query.
    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of entry sizes, ignoring the search query.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size).sum()
    }

    /// Human-readable [`total_size`](Self::total_size).
    pub fn formatted_total_size(&self) -> String {
        format_size(self.total_size())
    }

    /// Breadcrumb trail of the current prefix; empty at the root.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut path = String::new();
        segments(&self.current_prefix)
            .map(|name| {
                path.push_str(name);
                path.push('/');
                Breadcrumb {
                    name: name.to_string(),
                    path: path.clone(),
                }
            })
            .collect()
    }

    /// Prefix one level above the current one, or `None` at the root.
    pub fn parent_prefix(&self) -> Option<String> {
        let mut parts: Vec<&str> = segments(&self.current_prefix).collect();
        parts.pop()?;

        Some(if parts.is_empty() {
            String::new()
        } else {
            format!("{}/", parts.join("/"))
        })
    }
}

fn segments(prefix: &str) -> impl Iterator<Item = &str> {
    prefix.split('/').filter(|part| !part.is_empty())
}
