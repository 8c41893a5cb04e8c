//! TLS configuration and certificate loading.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::CertificateDer;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

use crate::error::ServerError;

/// Build a TLS acceptor from one PEM file holding the certificate chain and
/// the private key. Client certificates are not requested.
pub fn load_tls_acceptor(pem_path: &Path) -> Result<TlsAcceptor, ServerError> {
    let pem = std::fs::read(pem_path).map_err(|source| ServerError::CertificateRead {
        path: pem_path.to_path_buf(),
        source,
    })?;
    let config = server_config_from_pem(&pem, pem_path)?;
    Ok(TlsAcceptor::from(Arc::new(config)))
}

/// Parse PEM bytes into a rustls server configuration (TLS 1.2 and 1.3)
pub fn server_config_from_pem(pem: &[u8], origin: &Path) -> Result<ServerConfig, ServerError> {
    let cert_chain: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut Cursor::new(pem))
        .collect::<Result<_, _>>()
        .map_err(|source| ServerError::CertificateRead {
            path: origin.to_path_buf(),
            source,
        })?;
    if cert_chain.is_empty() {
        return Err(ServerError::NoCertificate(origin.to_path_buf()));
    }

    let key = rustls_pemfile::private_key(&mut Cursor::new(pem))
        .map_err(|source| ServerError::CertificateRead {
            path: origin.to_path_buf(),
            source,
        })?
        .ok_or_else(|| ServerError::NoPrivateKey(origin.to_path_buf()))?;

    let tls_error = |source| ServerError::Tls {
        path: origin.to_path_buf(),
        source,
    };
    let mut config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(tls_error)?
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .map_err(tls_error)?;
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(config)
}
