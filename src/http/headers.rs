//! Response-finishing hooks
//!
//! A hook receives the headers of a fully assembled response right before it
//! is handed to the connection for writing.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};

/// Runs on every response before its headers are written
pub type ResponseHook = fn(&mut HeaderMap);

pub const CROSS_ORIGIN_OPENER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-opener-policy");
pub const CROSS_ORIGIN_EMBEDDER_POLICY: HeaderName =
    HeaderName::from_static("cross-origin-embedder-policy");

/// Add the cross-origin isolation headers (opener policy first, then embedder policy)
pub fn apply_isolation_headers(headers: &mut HeaderMap) {
    headers.insert(
        CROSS_ORIGIN_OPENER_POLICY,
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        CROSS_ORIGIN_EMBEDDER_POLICY,
        HeaderValue::from_static("require-corp"),
    );
}
