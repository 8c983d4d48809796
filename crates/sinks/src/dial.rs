//! Connection dialers
//!
//! A [`Dialer`] owns the "establish a usable connection" capability for one
//! sink: plain TCP, or TLS over TCP honoring only `insecure_skip_verify`.
//! Dialing is bounded by the configured dial timeout. Connections are not
//! probed for liveness and carry no keepalive; a dead peer is discovered
//! when the next write fails.

use std::io::{self, ErrorKind};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;

use crate::error::SinkError;

/// Default dial timeout
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// A writable connection owned by a sink worker.
pub type Conn = Box<dyn AsyncWrite + Send + Unpin>;

/// Capability to establish a connection to one sink address.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(&self, addr: &str) -> Result<Conn, SinkError>;
}

/// Plain TCP dialer.
#[derive(Debug, Clone)]
pub struct TcpDialer {
    dial_timeout: Duration,
}

impl TcpDialer {
    pub fn new(dial_timeout: Duration) -> Self {
        Self { dial_timeout }
    }
}

#[async_trait]
impl Dialer for TcpDialer {
    async fn dial(&self, addr: &str) -> Result<Conn, SinkError> {
        let stream = connect_tcp(addr, self.dial_timeout).await?;
        Ok(Box::new(stream))
    }
}

/// TLS-over-TCP dialer.
///
/// With `insecure_skip_verify` the server certificate is accepted
/// unverified; otherwise the standard web-PKI roots apply. The TLS server
/// name is taken from the host portion of the sink address.
#[derive(Clone)]
pub struct TlsDialer {
    dial_timeout: Duration,
    connector: TlsConnector,
}

impl TlsDialer {
    pub fn new(dial_timeout: Duration, insecure_skip_verify: bool) -> Self {
        // Idempotent; an already-installed provider is fine.
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let config = if insecure_skip_verify {
            ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerification::new()))
                .with_no_client_auth()
        } else {
            let mut roots = rustls::RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            ClientConfig::builder()
                .with_root_certificates(roots)
                .with_no_client_auth()
        };
        Self {
            dial_timeout,
            connector: TlsConnector::from(Arc::new(config)),
        }
    }
}

#[async_trait]
impl Dialer for TlsDialer {
    async fn dial(&self, addr: &str) -> Result<Conn, SinkError> {
        let server_name = ServerName::try_from(host_of(addr).to_string()).map_err(|e| {
            SinkError::Dial {
                addr: addr.to_string(),
                source: io::Error::new(ErrorKind::InvalidInput, e),
            }
        })?;

        let handshake = async {
            let stream = connect_stream(addr).await?;
            self.connector.connect(server_name, stream).await
        };
        match timeout(self.dial_timeout, handshake).await {
            Ok(Ok(stream)) => Ok(Box::new(stream)),
            Ok(Err(source)) => Err(SinkError::Dial {
                addr: addr.to_string(),
                source,
            }),
            Err(_) => Err(timed_out(addr)),
        }
    }
}

async fn connect_tcp(addr: &str, dial_timeout: Duration) -> Result<TcpStream, SinkError> {
    match timeout(dial_timeout, connect_stream(addr)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(source)) => Err(SinkError::Dial {
            addr: addr.to_string(),
            source,
        }),
        Err(_) => Err(timed_out(addr)),
    }
}

async fn connect_stream(addr: &str) -> io::Result<TcpStream> {
    let stream = TcpStream::connect(addr).await?;
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(addr, error = %e, "failed to set TCP_NODELAY");
    }
    Ok(stream)
}

fn timed_out(addr: &str) -> SinkError {
    SinkError::Dial {
        addr: addr.to_string(),
        source: io::Error::new(ErrorKind::TimedOut, "dial timed out"),
    }
}

/// Host portion of a `host:port` address, brackets stripped for IPv6.
fn host_of(addr: &str) -> &str {
    let host = addr.rsplit_once(':').map_or(addr, |(host, _)| host);
    host.trim_start_matches('[').trim_end_matches(']')
}

/// Certificate verifier that accepts anything (`insecure_skip_verify`).
#[derive(Debug)]
struct NoVerification {
    schemes: Vec<SignatureScheme>,
}

impl NoVerification {
    fn new() -> Self {
        Self {
            schemes: rustls::crypto::aws_lc_rs::default_provider()
                .signature_verification_algorithms
                .supported_schemes(),
        }
    }
}

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.schemes.clone()
    }
}

#[cfg(test)]
#[path = "dial_test.rs"]
mod dial_test;
