//! HTTP cache validation module
//!
//! `ETag`/`Last-Modified` generation from file metadata and conditional request checks.

use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::time::UNIX_EPOCH;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Cache validators of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    /// Weak `ETag`, e.g. `W/"1a2b-65f0c3d1"`
    pub etag: String,
    /// Modification time truncated to whole seconds
    pub last_modified: Option<DateTime<Utc>>,
}

impl Validators {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let last_modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .and_then(|elapsed| i64::try_from(elapsed.as_secs()).ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        Self::new(metadata.len(), last_modified)
    }

    pub fn new(len: u64, last_modified: Option<DateTime<Utc>>) -> Self {
        let stamp = last_modified.map_or(0, |t| t.timestamp());
        Self {
            etag: format!("W/\"{len:x}-{stamp:x}\""),
            last_modified,
        }
    }

    /// `Last-Modified` header value
    pub fn last_modified_header(&self) -> Option<String> {
        self.last_modified.map(format_http_date)
    }

    /// Whether the client's cached copy is still current.
    ///
    /// `If-None-Match` takes precedence; `If-Modified-Since` is only consulted
    /// when it is absent.
    pub fn is_fresh(&self, if_none_match: Option<&str>, if_modified_since: Option<&str>) -> bool {
        if if_none_match.is_some() {
            return check_etag_match(if_none_match, &self.etag);
        }

        match (if_modified_since.and_then(parse_http_date), self.last_modified) {
            (Some(since), Some(modified)) => modified <= since,
            _ => false,
        }
    }
}

pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an IMF-fixdate such as `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Uses weak comparison; supports lists (`"a", W/"b"`) and the `*` wildcard.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    let ours = etag.trim_start_matches("W/");
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').map(str::trim).any(|e| {
            e == "*" || e.trim_start_matches("W/") == ours
        })
    })
}
