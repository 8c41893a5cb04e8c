//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static
//! resolution, then the response-finishing hook.

use crate::handler::{static_files, FileServer};
use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
}

/// Main entry point for HTTP request handling.
///
/// The finishing hook of `files` runs on every response, whatever its status.
pub async fn handle_request<B>(
    req: Request<B>,
    files: Arc<FileServer>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, _) = req.into_parts();

    let mut response = match check_http_method(&parts.method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: parts.uri.path(),
                query: parts.uri.query(),
                is_head: parts.method == Method::HEAD,
                if_none_match: header_str(&parts.headers, &IF_NONE_MATCH),
                if_modified_since: header_str(&parts.headers, &IF_MODIFIED_SINCE),
            };
            static_files::serve(&ctx, &files).await
        }
    };

    (files.finish)(response.headers_mut());
    Ok(response)
}

/// GET and HEAD are served; everything else is 501
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => Some(http::build_501_response(method.as_str())),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &hyper::header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
