//! Listing facade with live-then-fallback semantics.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::BucketConfig;
use crate::error::Result;
use crate::fallback::FallbackTable;
use crate::provider::ListingProvider;
use crate::reqwest::S3Client;
use crate::types::{ListingRequest, ListingResult, ServiceHealth};

/// Tracing target for facade operations.
pub const TRACING_TARGET: &str = "bucketview_object::service";

/// Listing facade over one bucket.
///
/// Tries the live provider when one is configured and answers from the
/// fallback table otherwise. Only validation errors reach the caller; every
/// other live failure is logged and replaced by fallback data.
///
/// Cloning is cheap; all state sits behind `Arc`.
#[derive(Clone)]
pub struct ListingService {
    live: Option<Arc<dyn ListingProvider>>,
    fallback: Arc<FallbackTable>,
    config: Arc<BucketConfig>,
}

impl fmt::Debug for ListingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingService")
            .field("live", &self.is_live())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ListingService {
    /// Builds the facade from configuration.
    ///
    /// A live S3 client is created only when both keys are present. When
    /// the client cannot be built the facade logs a warning and serves
    /// fallback listings instead.
    pub fn from_config(config: BucketConfig) -> Self {
        if !config.has_credentials() {
            tracing::info!(
                target: TRACING_TARGET,
                bucket = %config.bucket,
                "No credentials configured, serving fallback listings"
            );
            return Self::fallback_only(config);
        }

        match S3Client::new(config.clone()) {
            Ok(client) => Self::with_provider(config, client),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    endpoint = %config.endpoint,
                    error = %error,
                    "Cannot build live client, serving fallback listings"
                );
                Self::fallback_only(config)
            }
        }
    }

    /// Builds a facade that never goes live.
    pub fn fallback_only(config: BucketConfig) -> Self {
        Self {
            live: None,
            fallback: Arc::new(FallbackTable::builtin(&config)),
            config: Arc::new(config),
        }
    }

    /// Builds a facade around an arbitrary live provider.
    pub fn with_provider<P>(config: BucketConfig, provider: P) -> Self
    where
        P: ListingProvider + 'static,
    {
        Self {
            live: Some(Arc::new(provider)),
            ..Self::fallback_only(config)
        }
    }

    /// Replaces the fallback table.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackTable) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    /// Returns whether a live provider is configured.
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    /// Gets the bucket configuration.
    pub fn config(&self) -> &BucketConfig {
        &self.config
    }

    /// Gets the fallback table.
    pub fn fallback(&self) -> &FallbackTable {
        &self.fallback
    }

    /// Returns the public URL of a key.
    pub fn url_for(&self, key: &str) -> String {
        self.config.url_for(key)
    }

    /// Lists `prefix`, returning at most `max_keys` entries.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a live provider is configured and
    /// `max_keys` is outside `[1, 1000]`. Nothing else escapes.
    pub async fn list(&self, prefix: &str, max_keys: usize) -> Result<ListingResult> {
        self.list_objects(&ListingRequest::new(prefix, max_keys))
            .await
    }
}

#[async_trait::async_trait]
impl ListingProvider for ListingService {
    async fn list_objects(&self, request: &ListingRequest) -> Result<ListingResult> {
        let Some(live) = &self.live else {
            tracing::debug!(
                target: TRACING_TARGET,
                prefix = %request.prefix,
                max_keys = request.max_keys,
                "Listing from fallback table"
            );
            return Ok(self.fallback.list(&request.prefix, request.max_keys));
        };

        request.validate()?;

        let started_at = Instant::now();
        match live.list_objects(request).await {
            Ok(result) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    prefix = %request.prefix,
                    total_count = result.total_count,
                    has_more = result.has_more,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Live listing succeeded"
                );
                Ok(result)
            }
            Err(error) if !error.is_recoverable() => Err(error),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    prefix = %request.prefix,
                    kind = %error.kind,
                    error = %error,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    "Live listing failed, serving fallback data"
                );
                Ok(self.fallback.list(&request.prefix, request.max_keys))
            }
        }
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        match &self.live {
            Some(live) => live.health_check().await,
            None => Ok(ServiceHealth::degraded(
                "no credentials configured, serving fallback listings",
            )),
        }
    }
}
