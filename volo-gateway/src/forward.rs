//! Copies headers across the HTTP/gRPC boundary using a [`HeaderMatcher`].

use faststr::FastStr;
use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::{
    matcher::HeaderMatcher,
    metadata::{MetadataKey, MetadataMap},
};

/// Builds the incoming metadata of a call from HTTP request headers.
///
/// Every header the matcher forwards is appended under the mapped name, values
/// in their original order. Entries whose mapped name is not a valid key, or
/// whose value is not visible ASCII, are skipped.
pub fn incoming_metadata<M>(headers: &HeaderMap, matcher: &M) -> MetadataMap
where
    M: HeaderMatcher + ?Sized,
{
    let mut md = MetadataMap::with_capacity(headers.keys_len());
    for name in headers.keys() {
        let Some(mapped) = matcher.matches(name.as_str()) else {
            continue;
        };
        let key = match MetadataKey::new(mapped) {
            Ok(key) => key,
            Err(err) => {
                warn!("[VOLO] skip header {name}: {err}");
                continue;
            }
        };
        for value in headers.get_all(name) {
            match value.to_str() {
                Ok(value) => md.append(key.clone(), FastStr::new(value)),
                Err(_) => warn!("[VOLO] skip non-ascii value of header {name}"),
            }
        }
    }
    md
}

/// Builds HTTP response headers from the outgoing metadata of a call.
///
/// Every key the matcher forwards is written under the mapped name with all of
/// its values. Invalid header names or values are skipped.
pub fn outgoing_headers<M>(md: &MetadataMap, matcher: &M) -> HeaderMap
where
    M: HeaderMatcher + ?Sized,
{
    let mut headers = HeaderMap::with_capacity(md.len());
    for (key, values) in md {
        let Some(mapped) = matcher.matches(key.as_str()) else {
            continue;
        };
        let name = match HeaderName::from_bytes(mapped.as_bytes()) {
            Ok(name) => name,
            Err(err) => {
                warn!("[VOLO] skip metadata {key} mapped to {mapped}: {err}");
                continue;
            }
        };
        for value in values {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.append(name.clone(), value);
                }
                Err(err) => warn!("[VOLO] skip value of metadata {key}: {err}"),
            }
        }
    }
    headers
}
