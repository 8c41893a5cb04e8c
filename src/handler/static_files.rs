//! Static file serving module
//!
//! Resolves request paths under the root directory and builds file,
//! directory-listing and error responses.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::listing;
use super::router::RequestContext;
use super::FileServer;
use crate::http::cache::Validators;
use crate::http::path::{self, PathError};
use crate::http::{self, mime, response};
use crate::logger;

/// Why a path could not be resolved to something servable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Denied {
    NotFound,
    Forbidden,
    /// Resolved outside the root directory
    Escaped,
}

impl From<&io::Error> for Denied {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::Forbidden,
            _ => Self::NotFound,
        }
    }
}

fn denied_response(denied: Denied, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    match denied {
        Denied::Forbidden => http::build_403_response(ctx.is_head),
        Denied::NotFound => http::build_404_response(ctx.is_head),
        Denied::Escaped => {
            logger::log_traversal_blocked(ctx.path);
            http::build_404_response(ctx.is_head)
        }
    }
}

/// Canonicalize `candidate` and make sure it stays under `root` (already canonical)
async fn confine(root: &Path, candidate: &Path) -> Result<PathBuf, Denied> {
    let resolved = fs::canonicalize(candidate)
        .await
        .map_err(|e| Denied::from(&e))?;
    if resolved.starts_with(root) {
        Ok(resolved)
    } else {
        Err(Denied::Escaped)
    }
}

/// Serve whatever the request path names under the root directory
pub async fn serve(ctx: &RequestContext<'_>, files: &FileServer) -> Response<Full<Bytes>> {
    let relative = match path::normalize_request_path(ctx.path) {
        Ok(p) => p,
        Err(PathError::Traversal) => return denied_response(Denied::Escaped, ctx),
        Err(PathError::InvalidEncoding) => return http::build_404_response(ctx.is_head),
    };

    let root = match fs::canonicalize(&files.root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Root directory not found or inaccessible '{}': {e}",
                files.root.display()
            ));
            return http::build_404_response(ctx.is_head);
        }
    };

    let candidate = root.join(&relative);
    let resolved = match confine(&root, &candidate).await {
        Ok(p) => p,
        Err(denied) => return denied_response(denied, ctx),
    };

    let metadata = match fs::metadata(&resolved).await {
        Ok(m) => m,
        Err(e) => return denied_response(Denied::from(&e), ctx),
    };

    if metadata.is_dir() {
        serve_directory(ctx, files, &root, &resolved).await
    } else if ctx.path.ends_with('/') {
        // "/file.txt/" names a directory that does not exist
        http::build_404_response(ctx.is_head)
    } else {
        serve_file(ctx, &resolved, &candidate, &metadata).await
    }
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    files: &FileServer,
    root: &Path,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        // A leading "//" would make the Location protocol-relative (another host)
        let path = ctx.path.trim_start_matches('/');
        let target = match ctx.query {
            Some(query) => format!("/{path}/?{query}"),
            None => format!("/{path}/"),
        };
        return http::build_redirect_response(&target, ctx.is_head);
    }

    for index_file in &files.index_files {
        let candidate = dir.join(index_file);
        let Ok(resolved) = confine(root, &candidate).await else {
            continue;
        };
        if let Ok(metadata) = fs::metadata(&resolved).await {
            if metadata.is_file() {
                return serve_file(ctx, &resolved, &candidate, &metadata).await;
            }
        }
    }

    let entries = match listing::read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            return match e.kind() {
                io::ErrorKind::PermissionDenied => http::build_403_response(ctx.is_head),
                _ => http::build_500_response(ctx.is_head),
            };
        }
    };

    let display_path = path::decode_path(ctx.path).unwrap_or_else(|_| ctx.path.to_string());
    http::build_html_response(listing::render_listing(&display_path, &entries), ctx.is_head)
}

/// Serve a regular file.
///
/// `resolved` is read from disk; `requested` (the path before symlink
/// resolution) decides the Content-Type.
async fn serve_file(
    ctx: &RequestContext<'_>,
    resolved: &Path,
    requested: &Path,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let validators = Validators::from_metadata(metadata);
    if validators.is_fresh(ctx.if_none_match, ctx.if_modified_since) {
        return http::build_304_response(&validators);
    }

    let content = match fs::read(resolved).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                resolved.display()
            ));
            return http::build_500_response(ctx.is_head);
        }
    };

    response::build_file_response(
        content,
        mime::content_type_for(requested),
        &validators,
        ctx.is_head,
    )
}
