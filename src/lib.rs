//! QoF network function: bootstrap and lifecycle controller.

pub mod cli;
pub mod config;
pub mod context;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod producer;

pub use cli::Cli;
pub use config::schema::QofConfig;
pub use lifecycle::{Qof, Terminator};
pub use observability::LogCascade;
