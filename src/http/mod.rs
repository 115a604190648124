//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! router.rs new_router
//!     → [service registrar attaches handlers]
//!     → router.rs finish_router (access log, 404 fallback)
//!     → server.rs ServerBuilder::new_server(addr, key log, router)
//!     → server.rs SbiServer::listen_and_serve[_tls]
//! ```

pub mod router;
pub mod server;

pub use router::{finish_router, new_router};
pub use server::{HttpServer, HttpServerBuilder, NewServer, SbiServer, ServerBuilder, ServerError};
