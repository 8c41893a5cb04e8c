// Server configuration
// All values are fixed at startup; tests build their own `Config` values directly.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ServerError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ROOT: &str = "./dist";
pub const DEFAULT_CERT_FILE: &str = "localhost.pem";
pub const DEFAULT_INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_HEADER_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host name or address to bind
    pub host: String,
    pub port: u16,
    /// Directory tree exposed to clients
    pub root: PathBuf,
    /// PEM file holding both the certificate chain and the private key
    pub cert_file: PathBuf,
    /// Index files tried, in order, when a directory is requested
    pub index_files: Vec<String>,
    /// Tokio worker threads (`None` = one per CPU core)
    pub workers: Option<usize>,
    /// Upper bound for a client to finish the TLS handshake
    pub handshake_timeout: Duration,
    /// Upper bound for a client to send complete request headers
    pub header_read_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            root: PathBuf::from(DEFAULT_ROOT),
            cert_file: PathBuf::from(DEFAULT_CERT_FILE),
            index_files: DEFAULT_INDEX_FILES.iter().map(ToString::to_string).collect(),
            workers: None,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            header_read_timeout: DEFAULT_HEADER_READ_TIMEOUT,
        }
    }
}

impl Config {
    /// Startup line printed on stdout once the listener is bound
    pub fn announcement(&self) -> String {
        format!("Serving at: ('{}', {})", self.host, self.port)
    }

    /// Resolve `host:port` to the address the listener binds.
    ///
    /// IPv4 results win over IPv6 ones so that `localhost` maps to `127.0.0.1`.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let display = format!("{}:{}", self.host, self.port);
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|source| ServerError::Resolve {
                addr: display.clone(),
                source,
            })?
            .collect();

        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or(ServerError::NoAddress(display))
    }
}
