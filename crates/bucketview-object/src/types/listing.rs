//! Listing request and result types.

use serde::{Deserialize, Serialize};

use super::Entry;
use crate::error::{Error, Result};

/// Default number of keys requested per listing.
pub const DEFAULT_MAX_KEYS: usize = 100;

/// Largest page the object store accepts.
pub const MAX_KEYS_LIMIT: usize = 1000;

/// Parameters of one listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    /// Prefix scoping the listing to one virtual folder.
    pub prefix: String,
    /// Maximum number of entries to return.
    pub max_keys: usize,
    /// Continuation token of a previous truncated page.
    pub continuation_token: Option<String>,
}

impl ListingRequest {
    /// Creates a request for the given prefix and page size.
    pub fn new(prefix: impl Into<String>, max_keys: usize) -> Self {
        Self {
            prefix: prefix.into(),
            max_keys,
            continuation_token: None,
        }
    }

    /// Continues a truncated listing.
    #[must_use]
    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    /// Checks that `max_keys` lies in `[1, 1000]`.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_KEYS_LIMIT).contains(&self.max_keys) {
            return Err(Error::validation().with_message(format!(
                "max_keys must be between 1 and {MAX_KEYS_LIMIT}, got {}",
                self.max_keys
            )));
        }
        Ok(())
    }
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self::new("", DEFAULT_MAX_KEYS)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    /// Entries in listing order.
    #[serde(rename = "files")]
    pub entries: Vec<Entry>,
    /// Number of entries in this page.
    pub total_count: usize,
    /// Whether more entries exist past this page.
    pub has_more: bool,
    /// Token to request the next page, when the backend issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

impl ListingResult {
    /// Builds a page from entries, keeping `total_count` in sync.
    pub fn new(entries: Vec<Entry>, has_more: bool) -> Self {
        Self {
            total_count: entries.len(),
            entries,
            has_more,
            continuation_token: None,
        }
    }

    /// Filters candidates by prefix and truncates them to `max_keys`.
    ///
    /// `has_more` is set when more candidates matched than fit the page.
    pub fn from_candidates<'a, I>(candidates: I, prefix: &str, max_keys: usize) -> Self
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut matching = candidates
            .into_iter()
            .filter(|entry| entry.key.starts_with(prefix))
            .cloned();

        let entries: Vec<Entry> = matching.by_ref().take(max_keys).collect();
        let has_more = matching.next().is_some();

        Self::new(entries, has_more)
    }

    /// Sets the continuation token.
    #[must_use]
    pub fn with_continuation_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }

    /// Returns whether the page holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(keys: &[&str]) -> Vec<Entry> {
        keys.iter()
            .map(|key| Entry::file(*key, "2024-01-01T00:00:00Z", 1, "e", *key))
            .collect()
    }

    #[test]
    fn test_validate_bounds() {
        assert!(ListingRequest::new("", 1).validate().is_ok());
        assert!(ListingRequest::new("", 1000).validate().is_ok());
        assert!(ListingRequest::new("", 0).validate().is_err());
        assert!(ListingRequest::new("", 1001).validate().is_err());
    }

    #[test]
    fn test_default_request() {
        let request = ListingRequest::default();
        assert_eq!(request.prefix, "");
        assert_eq!(request.max_keys, 100);
        assert!(request.continuation_token.is_none());
    }

    #[test]
    fn test_from_candidates_filters_and_truncates() {
        let all = entries(&["a.txt", "pic/1.png", "pic/2.png", "pic/3.png"]);

        let page = ListingResult::from_candidates(&all, "pic/", 2);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.entries.len(), 2);
        assert!(page.has_more);

        let page = ListingResult::from_candidates(&all, "pic/", 3);
        assert_eq!(page.total_count, 3);
        assert!(!page.has_more);

        let page = ListingResult::from_candidates(&all, "", 10);
        assert_eq!(page.total_count, 4);
        assert!(!page.has_more);
    }

    #[test]
    fn test_from_candidates_zero_cap() {
        let all = entries(&["a.txt"]);
        let page = ListingResult::from_candidates(&all, "", 0);
        assert!(page.is_empty());
        assert!(page.has_more);
    }
}
