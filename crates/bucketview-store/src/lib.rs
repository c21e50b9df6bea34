#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod state;
mod store;

pub use state::{Breadcrumb, BrowserState};
pub use store::BucketStore;

/// Tracing target for store operations.
pub const TRACING_TARGET: &str = "bucketview_store";
