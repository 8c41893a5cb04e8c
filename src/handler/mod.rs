//! Request handler module
//!
//! Serves the root directory: files, index pages and directory listings.

pub mod listing;
pub mod router;
pub mod static_files;

use std::path::PathBuf;

use crate::config::Config;
use crate::http::{apply_isolation_headers, ResponseHook};

// Re-export main entry point
pub use router::handle_request;

/// Read-only state shared by every connection
#[derive(Debug, Clone)]
pub struct FileServer {
    /// Root directory; canonicalized per request so it may appear after startup
    pub root: PathBuf,
    pub index_files: Vec<String>,
    /// Runs on every assembled response before it is written
    pub finish: ResponseHook,
}

impl FileServer {
    /// File server with the cross-origin isolation hook
    pub fn new(root: PathBuf, index_files: Vec<String>) -> Self {
        Self {
            root,
            index_files,
            finish: apply_isolation_headers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.root.clone(), config.index_files.clone())
    }

    #[must_use]
    pub fn with_hook(mut self, finish: ResponseHook) -> Self {
        self.finish = finish;
        self
    }
}
