//! QoF network function.
//!
//! # Architecture Overview
//!
//! ```text
//!   --qofcfg / --free5gccfg
//!            │
//!            ▼
//!   ┌─────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//!   │ config loader   │───▶│ log level cascade│───▶│ version check    │
//!   └─────────────────┘    └──────────────────┘    └────────┬─────────┘
//!                                                           │
//!            ┌──────────────────────────────────────────────┘
//!            ▼
//!   ┌─────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//!   │ context init    │───▶│ service registrar│───▶│ settle / ready   │
//!   └─────────────────┘    └──────────────────┘    └────────┬─────────┘
//!            │                                              ▼
//!            │ (concurrent)                        ┌──────────────────┐
//!            ▼                                     │ SBI server       │
//!   ┌─────────────────┐                            │ http | https     │
//!   │ signal watcher  │── SIGINT/SIGTERM ─▶ exit 0 └──────────────────┘
//!   └─────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use qof::{Cli, LogCascade, Qof};

#[tokio::main]
async fn main() -> ExitCode {
    let control = match qof::observability::logging::init() {
        Ok(control) => control,
        Err(e) => {
            eprintln!("failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cli = Cli::parse();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), args = ?cli.filter_args(), "QOF starting");

    let cascade = LogCascade::standard(control);
    let qof = match Qof::initialize(&cli, &cascade) {
        Ok(qof) => qof,
        Err(e) => {
            tracing::error!(error = %e, "QOF initialization failed");
            return ExitCode::FAILURE;
        }
    };

    // start() logs its own failure.
    match qof.start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
