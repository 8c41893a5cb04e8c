//! Local development file server over TLS.
//!
//! Serves a directory tree over HTTPS and marks every response with the
//! cross-origin isolation headers (`Cross-Origin-Opener-Policy: same-origin`,
//! `Cross-Origin-Embedder-Policy: require-corp`).

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use error::ServerError;
pub use server::Server;
