//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Initialize (startup.rs):
//!     Load config → Cascade log levels → Check version
//!
//! Start (startup.rs):
//!     Init context → Arm signal watcher → Attach handlers
//!     → Wait for readiness (or settle delay) → Build server → Serve
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Terminator (shutdown.rs) → exit(0)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: context first, then handlers, then listener
//! - Two states only: Running → Terminating, never back
//! - Shutdown is best effort; failures are logged and the process still exits

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Deregistrar, LifecycleState, ShutdownError, Terminator};
pub use startup::{InitError, Qof, StartError, READINESS_TIMEOUT, SETTLE_DELAY};
