//! Listing data model.

mod entry;
mod health;
mod listing;

pub use entry::{Entry, EntryKind, StorageClass};
pub use health::{ServiceHealth, ServiceStatus};
pub use listing::{DEFAULT_MAX_KEYS, ListingRequest, ListingResult, MAX_KEYS_LIMIT};
