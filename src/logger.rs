//! Logger module
//!
//! Every line goes to stderr; stdout is reserved for the startup announcement.

use chrono::{DateTime, Local};
use std::net::SocketAddr;
use std::path::Path;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Format one log line
pub fn format_line(level: Level, message: &str, time: &DateTime<Local>) -> String {
    format!(
        "[{}] [{}] {message}",
        time.format("%Y-%m-%d %H:%M:%S"),
        level.as_str()
    )
}

fn write(level: Level, message: &str) {
    eprintln!("{}", format_line(level, message, &Local::now()));
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}

pub fn log_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info(&format!("Listening on: https://{addr}"));
    log_info(&format!("Serving files from: {}", config.root.display()));
    log_info(&format!("Certificate: {}", config.cert_file.display()));
    if let Some(workers) = config.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
}

pub fn log_root_missing(root: &Path) {
    log_warning(&format!(
        "Root directory '{}' does not exist; every request will get 404",
        root.display()
    ));
}

pub fn log_handshake_failed(peer_addr: &SocketAddr, err: &std::io::Error) {
    log_warning(&format!("[TLS] Handshake with {peer_addr} failed: {err}"));
}

pub fn log_handshake_timeout(peer_addr: &SocketAddr) {
    log_warning(&format!("[TLS] Handshake with {peer_addr} timed out"));
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &hyper::Error) {
    log_warning(&format!("[Connection] {peer_addr}: {err}"));
}

pub fn log_traversal_blocked(request_path: &str) {
    log_warning(&format!("Path traversal attempt blocked: {request_path}"));
}
