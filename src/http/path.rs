//! Request path normalization
//!
//! Turns the URI path into a relative filesystem path. Parent-directory
//! segments are refused outright instead of being resolved.

use percent_encoding::percent_decode_str;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Percent-decoding did not yield UTF-8
    InvalidEncoding,
    /// A `..` segment or a segment that could name another directory
    Traversal,
}

/// Percent-decode a URI path
pub fn decode_path(raw: &str) -> Result<String, PathError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| PathError::InvalidEncoding)
}

/// Map a URI path (`/a/b%20c.txt`) to a path relative to the root (`a/b c.txt`).
///
/// Empty and `.` segments are dropped.
pub fn normalize_request_path(raw: &str) -> Result<PathBuf, PathError> {
    let decoded = decode_path(raw)?;

    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(PathError::Traversal),
            s if s.contains(['\\', '\0']) => return Err(PathError::Traversal),
            s => relative.push(s),
        }
    }

    Ok(relative)
}
