//! HTTP response building module
//!
//! Builders for the responses the file server produces. Every error status
//! carries a small HTML page.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ALLOW, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED, LOCATION,
};
use hyper::{Response, StatusCode};

use super::cache::Validators;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Render the HTML error page for a status
pub fn error_page(status: StatusCode, message: &str) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{code} {reason}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{code} {reason}</h1>\n\
         <p>{}</p>\n\
         </body>\n\
         </html>\n",
        html_escape::encode_text(message)
    )
}

/// Build an error response with an HTML page body
pub fn build_error_response(
    status: StatusCode,
    message: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let page = error_page(status, message);
    let content_length = page.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(page)
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(status, &e))
}

pub fn build_404_response(is_head: bool) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::NOT_FOUND,
        "Nothing matches the given URI.",
        is_head,
    )
}

pub fn build_403_response(is_head: bool) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::FORBIDDEN,
        "Permission denied.",
        is_head,
    )
}

pub fn build_500_response(is_head: bool) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "The file could not be read.",
        is_head,
    )
}

/// Build 501 Not Implemented response for unsupported methods
pub fn build_501_response(method: &str) -> Response<Full<Bytes>> {
    let mut response = build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        &format!("Unsupported method ('{method}')."),
        false,
    );
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
    response
}

/// Build 301 redirect response (directory without trailing slash)
pub fn build_redirect_response(target: &str, is_head: bool) -> Response<Full<Bytes>> {
    let mut response = build_error_response(
        StatusCode::MOVED_PERMANENTLY,
        &format!("Moved to {target}"),
        is_head,
    );
    match HeaderValue::from_str(target) {
        Ok(location) => {
            response.headers_mut().insert(LOCATION, location);
            response
        }
        Err(e) => {
            crate::logger::log_error(&format!("Invalid redirect target '{target}': {e}"));
            build_404_response(is_head)
        }
    }
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 200 response for a file with its cache validators
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    validators: &Validators,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ETAG, validators.etag.as_str());
    if let Some(last_modified) = validators.last_modified_header() {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(validators: &Validators) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, validators.etag.as_str());
    if let Some(last_modified) = validators.last_modified_header() {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NOT_MODIFIED, &e))
}

/// Log a builder failure and fall back to a bare response with the same status
fn fallback(status: StatusCode, error: &hyper::http::Error) -> Response<Full<Bytes>> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}
