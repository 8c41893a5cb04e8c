//! HTTP protocol layer module
//!
//! Protocol helpers shared by the request handler: MIME detection, cache
//! validators, path normalization, response builders and finishing hooks.

pub mod cache;
pub mod headers;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used items
pub use headers::{apply_isolation_headers, ResponseHook};
pub use response::{
    build_304_response, build_403_response, build_404_response, build_500_response,
    build_501_response, build_html_response, build_redirect_response,
};
