//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT or SIGTERM
//! - Run the termination handler, then exit the process with status 0
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - One watcher per process; later arm attempts are no-ops
//! - Exit is abrupt: the accept loop is torn down by process exit

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Terminator;

static WATCHER_ARMED: AtomicBool = AtomicBool::new(false);

/// Resolves when the process receives SIGINT or (on unix) SIGTERM.
pub async fn termination_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received SIGINT"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGINT");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received SIGTERM");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Spawn a watcher: await `signal`, terminate, then call `exit(0)`.
pub fn spawn_watcher<F, E>(signal: F, terminator: Arc<Terminator>, exit: E) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
    E: FnOnce(i32) + Send + 'static,
{
    tokio::spawn(async move {
        signal.await;
        terminator.terminate();
        exit(0);
    })
}

/// Arm the process-wide OS signal watcher.
///
/// Returns `None` when a watcher is already armed.
pub fn arm_termination_watcher(terminator: Arc<Terminator>) -> Option<JoinHandle<()>> {
    if WATCHER_ARMED.swap(true, Ordering::SeqCst) {
        tracing::debug!("Termination watcher already armed");
        return None;
    }

    Some(spawn_watcher(termination_signal(), terminator, |code| {
        std::process::exit(code)
    }))
}
