#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod credentials;
mod error;
mod fallback;
mod format;
mod provider;
mod service;
mod types;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;

#[doc(hidden)]
pub mod prelude;
pub mod reqwest;

pub use config::{
    BucketConfig, DEFAULT_BUCKET, DEFAULT_ENDPOINT, DEFAULT_REGION, DEFAULT_TIMEOUT_SECS,
};
pub use credentials::Credentials;
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use fallback::FallbackTable;
pub use format::{FileIcon, format_date, format_size, icon_for};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::MockProvider;
pub use provider::ListingProvider;
pub use service::{ListingService, TRACING_TARGET};
pub use types::{
    DEFAULT_MAX_KEYS, Entry, EntryKind, ListingRequest, ListingResult, MAX_KEYS_LIMIT,
    ServiceHealth, ServiceStatus, StorageClass,
};
