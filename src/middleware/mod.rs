use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use hyper::{HeaderMap, header::{CONTENT_LENGTH, HeaderName, HeaderValue}};
use tracing::warn;

use crate::config::CACHE_STATUS_HEADER;
use crate::models::{CacheStatus, StoredHeaderValue};

#[cfg(test)]
mod tests;

/// Sets the indicator header, replacing whatever the origin sent.
pub fn tag_cache_status(headers: &mut HeaderMap, status: CacheStatus) {
    headers.insert(
        CACHE_STATUS_HEADER.clone(),
        HeaderValue::from_static(status.as_str()),
    );
}

pub fn capture_headers(headers: &HeaderMap) -> BTreeMap<String, StoredHeaderValue> {
    let mut captured = BTreeMap::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match captured.entry(name.as_str().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(StoredHeaderValue::One(value));
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(value),
        }
    }
    captured
}

/// Rebuilds a header map from stored headers, dropping any that are no
/// longer valid HTTP.
pub fn restore_headers(stored: &BTreeMap<String, StoredHeaderValue>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, values) in stored {
        let header_name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(header_name) => header_name,
            Err(_) => {
                warn!(header = %name, "skipping stored header with invalid name");
                continue;
            }
        };
        for value in values.values() {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.append(header_name.clone(), value);
                }
                Err(_) => warn!(header = %name, "skipping stored header with invalid value"),
            }
        }
    }
    headers
}

/// Rewrites a stale `content-length` so it matches the body actually sent.
pub fn sync_content_length(headers: &mut HeaderMap, body_len: usize) {
    if headers.contains_key(CONTENT_LENGTH) {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body_len));
    }
}
