// Connection handling module
// TLS handshake followed by HTTP/1.1 service, one task per connection

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;
use tokio_rustls::TlsAcceptor;

use crate::handler::{self, FileServer};
use crate::logger;

/// Per-connection time limits
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub handshake_timeout: Duration,
    pub header_read_timeout: Duration,
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Runs the TLS handshake, bounded by `handshake_timeout`
/// 2. Serves HTTP/1.1 over the encrypted stream with keep-alive
/// 3. Logs handshake and connection failures without touching other connections
///
/// A failed handshake closes the socket without writing any HTTP bytes.
pub fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    acceptor: TlsAcceptor,
    files: Arc<FileServer>,
    limits: ConnectionLimits,
) {
    tokio::spawn(async move {
        let tls_stream =
            match tokio::time::timeout(limits.handshake_timeout, acceptor.accept(stream)).await {
                Ok(Ok(s)) => s,
                Ok(Err(err)) => {
                    logger::log_handshake_failed(&peer_addr, &err);
                    return;
                }
                Err(_) => {
                    logger::log_handshake_timeout(&peer_addr);
                    return;
                }
            };

        let io = TokioIo::new(tls_stream);

        let mut builder = http1::Builder::new();
        builder
            .keep_alive(true)
            .timer(TokioTimer::new())
            .header_read_timeout(limits.header_read_timeout);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&files))),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&peer_addr, &err);
        }
    });
}
