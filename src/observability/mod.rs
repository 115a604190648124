//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! main
//!     → logging.rs init (reloadable EnvFilter + fmt layers)
//!     → cascade.rs LogCascade::standard (one Subsystem per linked library)
//!     → LogCascade::apply([logger] section)
//!         → Subsystem::set_level        → LogControl directive reload
//!         → Subsystem::set_report_caller → LogControl caller flags
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing, one target per subsystem
//! - Subsystem verbosity is explicit state behind a small trait, not globals
//! - Logging policy problems never abort startup

pub mod cascade;
pub mod logging;

pub use cascade::{LogCascade, Severity, Subsystem, SubsystemLogger, DEFAULT_SEVERITY};
pub use logging::LogControl;
