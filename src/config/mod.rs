//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --qofcfg path (or install-root default)
//!     → loader.rs (read & deserialize TOML)
//!     → validation.rs (semantic checks)
//!     → QofConfig (validated, immutable)
//!     → loader.rs check_config_version
//!     → shared via Arc with the lifecycle orchestrator
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod paths;
pub mod schema;
pub mod validation;

pub use loader::{check_config_version, load_config, ConfigError};
pub use schema::{LogSetting, LoggerConfig, QofConfig, SbiConfig, Scheme, Snssai, TlsPaths};
