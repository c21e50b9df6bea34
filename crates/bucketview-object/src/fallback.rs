//! Canned listings served when no live backend answers.

use std::collections::HashMap;

use crate::config::BucketConfig;
use crate::provider::ListingProvider;
use crate::types::{Entry, ListingRequest, ListingResult};
use crate::{Result, ServiceHealth};

/// Static listing table keyed by exact prefix.
///
/// Prefixes without a table entry list as empty.
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    listings: HashMap<String, Vec<Entry>>,
}

impl FallbackTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the built-in table with URLs pointing at the configured bucket.
    pub fn builtin(config: &BucketConfig) -> Self {
        let file = |key: &str, modified: &str, size: u64, etag: &str| {
            Entry::file(key, modified, size, etag, config.url_for(key))
        };
        let folder = |key: &str, modified: &str| Entry::folder(key, modified, config.url_for(key));

        Self::new()
            .with_listing(
                "",
                vec![
                    file("index.html", "2024-01-15T10:30:00Z", 2048, "abc123"),
                    folder("assets/", "2024-01-15T09:00:00Z"),
                    folder("docs/", "2024-01-12T08:15:00Z"),
                    folder("pic/", "2024-01-14T15:20:00Z"),
                    file("favicon.ico", "2024-01-10T11:00:00Z", 4286, "9f2c1e"),
                    file("robots.txt", "2024-01-10T11:05:00Z", 68, "0a7d43"),
                ],
            )
            .with_listing(
                "pic/",
                vec![
                    folder("pic/2024/", "2024-01-14T15:00:00Z"),
                    file("pic/logo.png", "2024-01-14T15:20:00Z", 15432, "def456"),
                    file("pic/banner.jpg", "2024-01-13T18:42:00Z", 248_832, "77ab0e"),
                    file("pic/diagram.svg", "2024-01-11T07:30:00Z", 9_317, "c41d88"),
                ],
            )
            .with_listing("assets/", Vec::new())
            .with_listing("docs/", Vec::new())
    }

    /// Adds or replaces the listing of one prefix.
    #[must_use]
    pub fn with_listing(mut self, prefix: impl Into<String>, entries: Vec<Entry>) -> Self {
        self.listings.insert(prefix.into(), entries);
        self
    }

    /// Returns the raw table row of a prefix.
    pub fn entries(&self, prefix: &str) -> &[Entry] {
        self.listings.get(prefix).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates over every entry of every prefix.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.listings.values().flatten()
    }

    /// Lists a prefix: exact-prefix lookup, prefix filter, then truncation.
    ///
    /// `max_keys` is not validated here; a zero cap yields an empty page.
    pub fn list(&self, prefix: &str, max_keys: usize) -> ListingResult {
        ListingResult::from_candidates(self.entries(prefix), prefix, max_keys)
    }
}

#[async_trait::async_trait]
impl ListingProvider for FallbackTable {
    async fn list_objects(&self, request: &ListingRequest) -> Result<ListingResult> {
        Ok(self.list(&request.prefix, request.max_keys))
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;

    fn table() -> FallbackTable {
        FallbackTable::builtin(&BucketConfig::default())
    }

    #[test]
    fn test_root_listing() {
        let page = table().list("", 100);
        assert_eq!(page.total_count, 6);
        assert!(!page.has_more);
        assert_eq!(page.entries[0].key, "index.html");
        assert_eq!(
            page.entries[0].url,
            "https://ap-south-1.linodeobjects.com/www/index.html"
        );
    }

    #[test]
    fn test_nested_listing() {
        let page = table().list("pic/", 100);
        assert_eq!(page.total_count, 4);
        assert!(page.entries.iter().all(|e| e.key.starts_with("pic/")));
    }

    #[test]
    fn test_known_and_unknown_empty_prefixes() {
        assert!(table().list("assets/", 100).is_empty());
        assert!(table().list("docs/", 100).is_empty());
        assert!(table().list("nope/", 100).is_empty());
        assert!(table().list("pic/2024/", 100).is_empty());
    }

    #[test]
    fn test_truncation_sets_has_more() {
        let page = table().list("", 2);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.total_count, 2);
        assert!(page.has_more);
    }

    #[test]
    fn test_never_exceeds_cap() {
        for prefix in ["", "pic/", "assets/", "x/"] {
            for max_keys in 1..10 {
                assert!(table().list(prefix, max_keys).entries.len() <= max_keys);
            }
        }
    }

    #[test]
    fn test_folder_invariant_holds_for_every_entry() {
        for entry in table().iter() {
            let is_folder = entry.kind == EntryKind::Folder;
            assert_eq!(is_folder, entry.key.ends_with('/'), "{}", entry.key);
            assert_eq!(is_folder, entry.size == 0, "{}", entry.key);
            assert_eq!(is_folder, entry.etag.is_empty(), "{}", entry.key);
        }
    }

    #[test]
    fn test_keys_unique_within_listing() {
        let page = table().list("", 100);
        let mut keys: Vec<_> = page.entries.iter().map(|e| e.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), page.entries.len());
    }

    #[tokio::test]
    async fn test_provider_ignores_out_of_range_cap() {
        let request = ListingRequest::new("", 5000);
        let page = table().list_objects(&request).await.unwrap();
        assert_eq!(page.total_count, 6);
    }
}
