//! Decoding of list-objects-v2 XML responses.

use std::collections::HashSet;

use serde::Deserialize;

use crate::config::BucketConfig;
use crate::error::{Error, Result};
use crate::types::{Entry, ListingRequest, ListingResult, StorageClass};

/// S3 XML response for ListObjectsV2.
#[derive(Debug, Deserialize)]
#[serde(rename = "ListBucketResult", rename_all = "PascalCase")]
struct ListBucketResult {
    #[serde(default)]
    is_truncated: bool,
    #[serde(default)]
    next_continuation_token: Option<String>,
    #[serde(default)]
    contents: Vec<ObjectContents>,
    #[serde(default)]
    common_prefixes: Vec<CommonPrefix>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectContents {
    key: String,
    #[serde(default)]
    last_modified: String,
    #[serde(default, rename = "ETag")]
    etag: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    storage_class: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CommonPrefix {
    prefix: String,
}

/// S3 XML error body.
#[derive(Debug, Deserialize)]
#[serde(rename = "Error", rename_all = "PascalCase")]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Decodes a list-objects-v2 body into one listing page.
///
/// Common prefixes become folders ahead of the object contents. The marker
/// object named exactly like the requested prefix is skipped, keys stay
/// unique, and the page never exceeds `request.max_keys`.
pub fn parse_listing(
    body: &str,
    config: &BucketConfig,
    request: &ListingRequest,
) -> Result<ListingResult> {
    let result: ListBucketResult = quick_xml::de::from_str(body)?;

    let folders = result.common_prefixes.into_iter().map(|common| {
        let url = config.url_for(&common.prefix);
        Entry::folder(common.prefix, String::new(), url)
    });

    let files = result.contents.into_iter().map(|object| {
        let etag = object.etag.trim_matches('"').to_string();
        let url = config.url_for(&object.key);
        let class = StorageClass::from(object.storage_class.unwrap_or_default());
        if object.key.ends_with('/') {
            Entry::folder(object.key, object.last_modified, url).with_storage_class(class)
        } else {
            Entry::file(object.key, object.last_modified, object.size, etag, url)
                .with_storage_class(class)
        }
    });

    let mut seen = HashSet::new();
    let mut candidates = folders
        .chain(files)
        .filter(|entry| request.prefix.is_empty() || entry.key != request.prefix)
        .filter(|entry| seen.insert(entry.key.clone()));

    let entries: Vec<Entry> = candidates.by_ref().take(request.max_keys).collect();
    let has_more = result.is_truncated || candidates.next().is_some();

    Ok(ListingResult::new(entries, has_more)
        .with_continuation_token(result.next_continuation_token.filter(|t| !t.is_empty())))
}

/// Describes a non-success response, using the S3 error body when present.
pub fn describe_error(status: u16, body: &str) -> String {
    match quick_xml::de::from_str::<ErrorBody>(body) {
        Ok(error) if !error.code.is_empty() => {
            if error.message.is_empty() {
                format!("HTTP {status}: {}", error.code)
            } else {
                format!("HTTP {status}: {}: {}", error.code, error.message)
            }
        }
        _ => format!("HTTP {status}"),
    }
}

/// Wraps [`describe_error`] into a transport error.
pub fn status_error(status: u16, body: &str) -> Error {
    Error::transport().with_message(describe_error(status, body))
}
