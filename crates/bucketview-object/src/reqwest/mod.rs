//! Reqwest-based live listing backend.
//!
//! This module provides a reqwest-based implementation of the
//! [`ListingProvider`](crate::ListingProvider) trait that talks to an
//! S3-compatible endpoint with SigV4-signed list-objects-v2 requests.

mod client;
mod response;
mod signing;

pub use client::S3Client;
pub use response::{describe_error, parse_listing};
pub use signing::{SignedHeaders, Signer, canonical_query};

/// Tracing target for live listing operations.
pub const TRACING_TARGET: &str = "bucketview_object::reqwest";
