//! Shared browser store.

use std::fmt;
use std::sync::Arc;

use bucketview_object::{DEFAULT_MAX_KEYS, Entry, ListingProvider, ListingRequest};
use parking_lot::RwLock;

use crate::TRACING_TARGET;
use crate::state::{Breadcrumb, BrowserState};

/// Message recorded when a load ends without an outcome.
const LOAD_ABORTED: &str = "load aborted";

#[derive(Debug, Default)]
struct StoreInner {
    state: BrowserState,
    generation: u64,
}

/// Clears `loading` when a load is dropped or unwinds before it records an
/// outcome, as long as no newer load has started.
struct InFlight<'a> {
    inner: &'a RwLock<StoreInner>,
    generation: u64,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut inner = self.inner.write();
        if inner.generation != self.generation {
            return;
        }

        tracing::warn!(
            target: TRACING_TARGET,
            generation = self.generation,
            panicking = std::thread::panicking(),
            "Load ended without an outcome"
        );
        inner.state.loading = false;
        inner.state.error = Some(LOAD_ABORTED.to_string());
    }
}

/// Browser state for one bucket, backed by a listing provider.
///
/// Methods take `&self`; the state sits behind a lock that is never held
/// across an await. Overlapping loads resolve last-started-wins: a load
/// whose generation is no longer the latest when it completes leaves the
/// state untouched, so `loading` stays set until the newest load finishes.
pub struct BucketStore {
    provider: Arc<dyn ListingProvider>,
    inner: RwLock<StoreInner>,
    page_size: usize,
}

impl fmt::Debug for BucketStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketStore")
            .field("state", &self.inner.read().state)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl BucketStore {
    /// Creates an empty store over the given provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: ListingProvider + 'static,
    {
        Self::from_shared(Arc::new(provider))
    }

    /// Creates an empty store over an already shared provider.
    pub fn from_shared(provider: Arc<dyn ListingProvider>) -> Self {
        Self {
            provider,
            inner: RwLock::new(StoreInner::default()),
            page_size: DEFAULT_MAX_KEYS,
        }
    }

    /// Sets how many keys each load requests.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Returns how many keys each load requests.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns a copy of the whole state.
    pub fn snapshot(&self) -> BrowserState {
        self.inner.read().state.clone()
    }

    /// Returns the entries of the last successful load.
    pub fn entries(&self) -> Vec<Entry> {
        self.inner.read().state.entries.clone()
    }

    /// Returns whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.read().state.loading
    }

    /// Returns the message of the last failed load.
    pub fn error(&self) -> Option<String> {
        self.inner.read().state.error.clone()
    }

    /// Returns the current search query.
    pub fn search_query(&self) -> String {
        self.inner.read().state.search_query.clone()
    }

    /// Returns the prefix of the last successful load.
    pub fn current_prefix(&self) -> String {
        self.inner.read().state.current_prefix.clone()
    }

    /// Loads `prefix` and replaces the entries on success.
    ///
    /// Never fails: a provider error lands in [`error`](Self::error) and the
    /// previous entries and prefix stay in place. If the provider panics or
    /// the returned future is dropped early, `loading` is cleared and
    /// [`error`](Self::error) reads `"load aborted"`.
    pub async fn load(&self, prefix: &str) {
        let generation = {
            let mut inner = self.inner.write();
            inner.generation += 1;
            inner.state.loading = true;
            inner.state.error = None;
            inner.generation
        };
        let mut in_flight = InFlight {
            inner: &self.inner,
            generation,
            settled: false,
        };

        tracing::debug!(
            target: TRACING_TARGET,
            prefix,
            generation,
            page_size = self.page_size,
            "Loading prefix"
        );

        let request = ListingRequest::new(prefix, self.page_size);
        let result = self.provider.list_objects(&request).await;
        in_flight.settle();

        let mut inner = self.inner.write();
        if inner.generation != generation {
            tracing::debug!(
                target: TRACING_TARGET,
                prefix,
                generation,
                latest = inner.generation,
                "Discarding stale load"
            );
            return;
        }

        match result {
            Ok(listing) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    prefix,
                    total_count = listing.total_count,
                    has_more = listing.has_more,
                    "Prefix loaded"
                );
                inner.state.entries = listing.entries;
                inner.state.current_prefix = prefix.to_string();
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    prefix,
                    error = %error,
                    "Failed to load prefix"
                );
                inner.state.error = Some(error.reason());
            }
        }
        inner.state.loading = false;
    }

    /// Reloads the current prefix.
    pub async fn refresh(&self) {
        let prefix = self.current_prefix();
        self.load(&prefix).await;
    }

    /// Sets the search query applied by [`filtered_entries`](Self::filtered_entries).
    pub fn set_search_query(&self, query: impl Into<String>) {
        self.inner.write().state.search_query = query.into();
    }

    /// Clears the error message.
    pub fn clear_error(&self) {
        self.inner.write().state.error = None;
    }

    /// Loads a folder key.
    pub async fn to_folder(&self, key: &str) {
        self.load(key).await;
    }

    /// Loads the parent of the current prefix; does nothing at the root.
    pub async fn to_parent(&self) {
        let parent = self.inner.read().state.parent_prefix();
        if let Some(parent) = parent {
            self.load(&parent).await;
        }
    }

    /// Loads the root listing.
    pub async fn to_root(&self) {
        self.load("").await;
    }

    /// Entries whose key contains the search query, ignoring case.
    pub fn filtered_entries(&self) -> Vec<Entry> {
        self.inner.read().state.filtered_entries()
    }

    /// Number of loaded entries, ignoring the search query.
    pub fn total_count(&self) -> usize {
        self.inner.read().state.total_count()
    }

    /// Sum of loaded entry sizes, ignoring the search query.
    pub fn total_size(&self) -> u64 {
        self.inner.read().state.total_size()
    }

    /// Human-readable total size.
    pub fn formatted_total_size(&self) -> String {
        self.inner.read().state.formatted_total_size()
    }

    /// Breadcrumb trail of the current prefix.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.inner.read().state.breadcrumbs()
    }
}
