//! Termination handling for the network function.

use std::sync::atomic::{AtomicU8, Ordering};

use thiserror::Error;

/// Process lifecycle. `Running` → `Terminating` happens once and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    Running = 0,
    Terminating = 1,
}

/// Error reported by a shutdown step. Logged, never retried.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("deregistration failed: {0}")]
    Deregistration(String),
}

/// Removes this instance from external registries (e.g. the NRF).
pub trait Deregistrar: Send + Sync {
    fn deregister(&self) -> Result<(), ShutdownError>;
}

/// Runs the shutdown sequence at most once.
pub struct Terminator {
    state: AtomicU8,
    deregistrar: Option<Box<dyn Deregistrar>>,
}

impl Terminator {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Running as u8),
            deregistrar: None,
        }
    }

    /// Attach a deregistration step to the shutdown sequence.
    pub fn with_deregistrar(mut self, deregistrar: impl Deregistrar + 'static) -> Self {
        self.deregistrar = Some(Box::new(deregistrar));
        self
    }

    pub fn state(&self) -> LifecycleState {
        match self.state.load(Ordering::SeqCst) {
            0 => LifecycleState::Running,
            _ => LifecycleState::Terminating,
        }
    }

    /// Move to `Terminating` and run the shutdown steps.
    ///
    /// Returns `false` without doing anything if termination already ran.
    pub fn terminate(&self) -> bool {
        if self
            .state
            .compare_exchange(
                LifecycleState::Running as u8,
                LifecycleState::Terminating as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            tracing::debug!("Termination already in progress");
            return false;
        }

        tracing::info!("Terminating QOF...");

        if let Some(deregistrar) = &self.deregistrar {
            match deregistrar.deregister() {
                Ok(()) => tracing::info!("Deregistered from NRF"),
                Err(e) => tracing::error!(error = %e, "Deregistration failed, exiting anyway"),
            }
        }

        true
    }
}

impl Default for Terminator {
    fn default() -> Self {
        Self::new()
    }
}
