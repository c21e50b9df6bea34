//! Provider seam for listing backends.

use crate::types::{ListingRequest, ListingResult, ServiceHealth};
use crate::Result;

/// Core trait for anything that can list a bucket prefix.
///
/// Implemented by the live S3 client, the fallback table, the
/// [`ListingService`](crate::ListingService) facade itself, and the mock
/// provider used in tests.
#[async_trait::async_trait]
pub trait ListingProvider: Send + Sync {
    /// Lists the entries under `request.prefix`.
    async fn list_objects(&self, request: &ListingRequest) -> Result<ListingResult>;

    /// Performs a health check on the provider.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
