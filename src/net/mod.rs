//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! https scheme:
//!     tls.rs load_tls_config (PEM cert + key, ALPN h2/http1.1)
//!     → tls.rs KeyLogFile (SSL key log, optional)
//!     → axum-server rustls acceptor (http/server.rs)
//! ```

pub mod tls;

pub use tls::{load_tls_config, KeyLogFile, TlsError};
