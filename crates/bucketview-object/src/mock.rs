//! Scripted listing provider for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! bucketview-object = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use bucketview_object::{ErrorKind, ListingService, MockProvider};
//!
//! let mock = MockProvider::new().fail_with(ErrorKind::Transport, "connection reset");
//! let service = ListingService::with_provider(Default::default(), mock.clone());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, ErrorKind, Result};
use crate::provider::ListingProvider;
use crate::types::{Entry, ListingRequest, ListingResult, ServiceHealth};

#[derive(Debug, Default)]
struct MockState {
    listings: HashMap<String, Vec<Entry>>,
    failure: Option<(ErrorKind, String)>,
    calls: Vec<ListingRequest>,
}

/// Listing provider with scripted answers.
///
/// Clones share state, so a test can keep a handle to inspect recorded calls
/// after moving the provider into a service.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Creates a provider that lists every prefix as empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the entries a prefix lists.
    #[must_use]
    pub fn with_listing(self, prefix: impl Into<String>, entries: Vec<Entry>) -> Self {
        self.state.lock().listings.insert(prefix.into(), entries);
        self
    }

    /// Makes every following call fail with the given error.
    #[must_use]
    pub fn fail_with(self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.set_failure(Some((kind, message.into())));
        self
    }

    /// Replaces the scripted failure; `None` makes calls succeed again.
    pub fn set_failure(&self, failure: Option<(ErrorKind, String)>) {
        self.state.lock().failure = failure;
    }

    /// Returns every request received so far.
    pub fn calls(&self) -> Vec<ListingRequest> {
        self.state.lock().calls.clone()
    }

    /// Returns how many requests were received.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }
}

#[async_trait::async_trait]
impl ListingProvider for MockProvider {
    async fn list_objects(&self, request: &ListingRequest) -> Result<ListingResult> {
        let mut state = self.state.lock();
        state.calls.push(request.clone());

        if let Some((kind, message)) = &state.failure {
            return Err(Error::new(*kind).with_message(message.clone()));
        }

        let entries = state
            .listings
            .get(&request.prefix)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(ListingResult::from_candidates(
            entries,
            &request.prefix,
            request.max_keys,
        ))
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(match &self.state.lock().failure {
            Some((_, message)) => ServiceHealth::unhealthy(message.clone()),
            None => ServiceHealth::healthy(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> Entry {
        Entry::file(key, "2024-01-01T00:00:00Z", 1, "e", key)
    }

    #[tokio::test]
    async fn test_scripted_listing_and_calls() {
        let mock = MockProvider::new().with_listing("a/", vec![entry("a/1"), entry("a/2")]);

        let page = mock
            .list_objects(&ListingRequest::new("a/", 1))
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert!(page.has_more);

        let empty = mock.list_objects(&ListingRequest::default()).await.unwrap();
        assert!(empty.is_empty());

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls()[0].prefix, "a/");
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let mock = MockProvider::new().fail_with(ErrorKind::Parse, "garbage");
        let err = mock
            .list_objects(&ListingRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
        assert!(!mock.health_check().await.unwrap().is_healthy());

        mock.set_failure(None);
        assert!(mock.list_objects(&ListingRequest::default()).await.is_ok());
    }
}
