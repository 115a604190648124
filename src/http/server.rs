//! SBI server setup.
//!
//! # Responsibilities
//! - Construct a server for an address, SSL key log path, and router
//! - Serve plaintext HTTP/1.1 + HTTP/2 via `axum::serve`
//! - Serve TLS via `axum-server` with rustls
//!
//! # Design Decisions
//! - Construction is two-tier: an unusable address yields no server (fatal),
//!   an unusable key log yields a server plus a warning
//! - Serving blocks until the listener fails or the process exits

use std::future::Future;
use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::net::tls::{load_tls_config, KeyLogFile, TlsError};

/// Error type for server construction and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address {addr}: {source}")]
    Address {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("cannot open SSL key log {}: {source}", path.display())]
    KeyLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}

/// A constructed server and the non-fatal construction problem, if any.
pub struct NewServer<S> {
    pub server: S,
    pub warning: Option<ServerError>,
}

/// Builds servers for the lifecycle orchestrator.
pub trait ServerBuilder: Send + Sync {
    type Server: SbiServer;

    fn new_server(
        &self,
        addr: &str,
        key_log_path: &Path,
        router: Router,
    ) -> Result<NewServer<Self::Server>, ServerError>;
}

/// A server ready to accept connections.
pub trait SbiServer: Send + 'static {
    /// Serve plaintext until failure.
    fn listen_and_serve(self) -> impl Future<Output = Result<(), ServerError>> + Send;

    /// Serve TLS with the given PEM certificate and key until failure.
    fn listen_and_serve_tls(
        self,
        cert_path: PathBuf,
        key_path: PathBuf,
    ) -> impl Future<Output = Result<(), ServerError>> + Send;
}

/// Production builder backed by axum.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpServerBuilder;

/// axum server bound to one address.
pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
    key_log: Option<Arc<KeyLogFile>>,
}

impl HttpServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl ServerBuilder for HttpServerBuilder {
    type Server = HttpServer;

    fn new_server(
        &self,
        addr: &str,
        key_log_path: &Path,
        router: Router,
    ) -> Result<NewServer<HttpServer>, ServerError> {
        let addr: SocketAddr = addr.parse().map_err(|source| ServerError::Address {
            addr: addr.to_string(),
            source,
        })?;

        let (key_log, warning) = match KeyLogFile::open(key_log_path) {
            Ok(file) => (Some(Arc::new(file)), None),
            Err(source) => (
                None,
                Some(ServerError::KeyLog {
                    path: key_log_path.to_path_buf(),
                    source,
                }),
            ),
        };

        Ok(NewServer {
            server: HttpServer {
                addr,
                router,
                key_log,
            },
            warning,
        })
    }
}

impl SbiServer for HttpServer {
    async fn listen_and_serve(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;

        tracing::info!(address = %self.addr, scheme = "http", "SBI server listening");

        axum::serve(listener, self.router)
            .await
            .map_err(ServerError::Serve)
    }

    async fn listen_and_serve_tls(
        self,
        cert_path: PathBuf,
        key_path: PathBuf,
    ) -> Result<(), ServerError> {
        let config = load_tls_config(&cert_path, &key_path, self.key_log.clone()).await?;

        tracing::info!(
            address = %self.addr,
            scheme = "https",
            cert = %cert_path.display(),
            "SBI server listening"
        );

        axum_server::bind_rustls(self.addr, config)
            .serve(self.router.into_make_service())
            .await
            .map_err(ServerError::Serve)
    }
}
