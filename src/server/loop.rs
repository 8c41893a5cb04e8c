// Server loop module
// Accepts connections and hands each one to its own task

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use super::connection::{handle_connection, ConnectionLimits};
use crate::handler::FileServer;
use crate::logger;

/// Accept connections forever.
///
/// Accept errors (e.g. descriptor exhaustion) are logged and the loop keeps going.
pub async fn start_server_loop(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    files: Arc<FileServer>,
    limits: ConnectionLimits,
) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                handle_connection(
                    stream,
                    peer_addr,
                    acceptor.clone(),
                    Arc::clone(&files),
                    limits,
                );
            }
            Err(e) => {
                logger::log_error(&format!("Failed to accept connection: {e}"));
            }
        }
    }
}
