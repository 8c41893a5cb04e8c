// Server module entry
// Bootstrap (TLS context, listener) and the connection-accept loop

pub mod connection;
pub mod listener;
pub mod signal;
pub mod tls;

// Rust does not allow `loop` as a module name (keyword), so use server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use crate::config::Config;
use crate::error::ServerError;
use crate::handler::FileServer;
use crate::logger;

pub use connection::ConnectionLimits;
pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::wait_for_termination;
pub use tls::load_tls_acceptor;

/// A bound, ready-to-run TLS file server
pub struct Server {
    listener: TcpListener,
    acceptor: TlsAcceptor,
    files: Arc<FileServer>,
    limits: ConnectionLimits,
}

impl Server {
    /// Load the TLS material and bind the listener.
    ///
    /// Fails fast on an unreadable or invalid certificate file and on an
    /// address that cannot be bound. A missing root directory is only
    /// reported. Must be called from within a Tokio runtime.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        let acceptor = load_tls_acceptor(&config.cert_file)?;

        let addr = config.socket_addr()?;
        let listener =
            create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;

        if !config.root.is_dir() {
            logger::log_root_missing(&config.root);
        }

        Ok(Self {
            listener,
            acceptor,
            files: Arc::new(FileServer::from_config(config)),
            limits: ConnectionLimits {
                handshake_timeout: config.handshake_timeout,
                header_read_timeout: config.header_read_timeout,
            },
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the task is dropped
    pub async fn run(self) {
        start_server_loop(self.listener, self.acceptor, self.files, self.limits).await;
    }
}
