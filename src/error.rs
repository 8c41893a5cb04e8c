//! Bootstrap errors
//!
//! Anything that stops the server from starting. Failures after startup are
//! confined to a single connection and never become a `ServerError`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to read certificate file '{}': {source}", .path.display())]
    CertificateRead { path: PathBuf, source: io::Error },

    #[error("no certificate found in '{}'", .0.display())]
    NoCertificate(PathBuf),

    #[error("no private key found in '{}'", .0.display())]
    NoPrivateKey(PathBuf),

    #[error("invalid TLS material in '{}': {source}", .path.display())]
    Tls {
        path: PathBuf,
        source: tokio_rustls::rustls::Error,
    },

    #[error("failed to resolve '{addr}': {source}")]
    Resolve { addr: String, source: io::Error },

    #[error("'{0}' did not resolve to any address")]
    NoAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
