//! Shared helpers for the end-to-end tests: scratch directories, a server on
//! an ephemeral port with a freshly generated certificate, and a tiny
//! HTTP/1.1-over-TLS client.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use coi_serve::{Config, Server};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Scratch directory removed on drop
pub struct TestDir {
    pub path: PathBuf,
}

impl TestDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "coi-serve-it-{name}-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).expect("create scratch dir");
        Self { path }
    }

    pub fn write(&self, relative: &str, contents: &[u8]) {
        let target = self.path.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(target, contents).expect("write file");
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Self-signed `localhost` certificate: (combined PEM, DER certificate)
pub fn localhost_certificate() -> (String, tokio_rustls::rustls::pki_types::CertificateDer<'static>) {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .expect("generate certificate");
    let pem = format!(
        "{}{}",
        certified.cert.pem(),
        certified.key_pair.serialize_pem()
    );
    (pem, certified.cert.der().clone())
}

/// Config for a test server: loopback, ephemeral port, the given root and cert file
pub fn test_config(root: PathBuf, cert_file: PathBuf) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        root,
        cert_file,
        ..Config::default()
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub dir: TestDir,
    connector: TlsConnector,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose root is `<scratch>/dist`; `setup` populates the scratch dir
    pub async fn start(name: &str, setup: impl FnOnce(&TestDir)) -> Self {
        let dir = TestDir::new(name);
        std::fs::create_dir_all(dir.path.join("dist")).expect("create dist");
        setup(&dir);

        let (pem, cert_der) = localhost_certificate();
        dir.write("localhost.pem", pem.as_bytes());

        let config = test_config(dir.path.join("dist"), dir.path.join("localhost.pem"));
        let server = Server::bind(&config).expect("bind test server");
        let addr = server.local_addr().expect("local addr");
        let handle = tokio::spawn(server.run());

        let mut roots = RootCertStore::empty();
        roots.add(cert_der).expect("trust test certificate");
        let client_config = ClientConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .expect("protocol versions")
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self {
            addr,
            dir,
            connector: TlsConnector::from(Arc::new(client_config)),
            handle,
        }
    }

    pub async fn connect(&self) -> TlsStream<TcpStream> {
        let tcp = TcpStream::connect(self.addr).await.expect("tcp connect");
        let domain = ServerName::try_from("localhost").expect("server name");
        self.connector
            .connect(domain, tcp)
            .await
            .expect("tls handshake")
    }

    /// One request on a fresh connection (`Connection: close`)
    pub async fn request(&self, method: &str, target: &str) -> HttpResponse {
        self.request_with(method, target, &[]).await
    }

    pub async fn request_with(
        &self,
        method: &str,
        target: &str,
        headers: &[(&str, &str)],
    ) -> HttpResponse {
        let mut stream = self.connect().await;
        let mut raw = format!("{method} {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
        for (name, value) in headers {
            raw.push_str(&format!("{name}: {value}\r\n"));
        }
        if method == "POST" || method == "PUT" {
            raw.push_str("Content-Length: 0\r\n");
        }
        raw.push_str("\r\n");
        stream.write_all(raw.as_bytes()).await.expect("write request");

        read_response(&mut stream, method == "HEAD").await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn assert_isolated(&self) {
        assert_eq!(
            self.header("cross-origin-opener-policy"),
            Some("same-origin"),
            "missing opener policy on {self:?}"
        );
        assert_eq!(
            self.header("cross-origin-embedder-policy"),
            Some("require-corp"),
            "missing embedder policy on {self:?}"
        );
    }
}

/// Read one response: headers, then exactly `Content-Length` body bytes
pub async fn read_response<S: AsyncRead + Unpin>(stream: &mut S, is_head: bool) -> HttpResponse {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = tokio::time::timeout(READ_TIMEOUT, stream.read(&mut chunk))
            .await
            .expect("response timed out")
            .expect("read response");
        assert!(n > 0, "connection closed before headers: {:?}", String::from_utf8_lossy(&buf));
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let status_line = lines.next().expect("status line");
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    let mut response = HttpResponse {
        status,
        headers,
        body: buf[header_end + 4..].to_vec(),
    };

    let expected = if is_head || status == 304 {
        0
    } else {
        response
            .header("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0)
    };

    while response.body.len() < expected {
        let n = tokio::time::timeout(READ_TIMEOUT, stream.read(&mut chunk))
            .await
            .expect("body timed out")
            .expect("read body");
        assert!(n > 0, "connection closed mid-body");
        response.body.extend_from_slice(&chunk[..n]);
    }

    response
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
