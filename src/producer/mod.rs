//! Service registrar: attaches request handlers to the SBI router.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tokio::sync::watch;

use crate::context::{NfProfile, QofContext};

/// Path of the status endpoint served by [`QofProducer`].
pub const STATUS_PATH: &str = "/nqof-oam/v1/status";

/// Attaches business handlers to the router, once, after the context exists.
pub trait ServiceRegistrar: Send + Sync {
    fn add_service(&self, router: Router, context: &Arc<QofContext>) -> Router;

    /// Flips to `true` once the registrar's background work is ready.
    ///
    /// `None` means the registrar cannot tell, and the orchestrator falls
    /// back to its fixed settling delay.
    fn readiness(&self) -> Option<watch::Receiver<bool>> {
        None
    }
}

/// Default handler set.
#[derive(Debug, Clone, Copy, Default)]
pub struct QofProducer;

impl ServiceRegistrar for QofProducer {
    fn add_service(&self, router: Router, context: &Arc<QofContext>) -> Router {
        tracing::debug!(path = STATUS_PATH, "Adding QOF services");
        router.merge(
            Router::new()
                .route(STATUS_PATH, get(status))
                .with_state(Arc::clone(context)),
        )
    }
}

async fn status(State(context): State<Arc<QofContext>>) -> Json<NfProfile> {
    Json(context.profile())
}
