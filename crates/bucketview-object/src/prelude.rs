//! Commonly used items from bucketview-object.
//!
//! ```rust,ignore
//! use bucketview_object::prelude::*;
//! ```

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use crate::MockProvider;
pub use crate::{
    BucketConfig, Entry, EntryKind, Error, ErrorKind, FallbackTable, ListingProvider,
    ListingRequest, ListingResult, ListingService, Result, ServiceHealth, ServiceStatus,
    format_date, format_size, icon_for,
};
