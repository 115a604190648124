//! Shared fakes for lifecycle integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::Router;
use qof::config::QofConfig;
use qof::context::QofContext;
use qof::http::{NewServer, SbiServer, ServerBuilder, ServerError};
use qof::producer::ServiceRegistrar;
use tokio::sync::watch;

/// Something the orchestrator did, in the order it did it.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    HandlersAttached { context_ready_at: Option<Instant> },
    ServerBuilt { addr: String, key_log: PathBuf },
    ServedPlaintext,
    ServedTls { cert: PathBuf, key: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<(Instant, Event)>>>);

impl Recorder {
    pub fn record(&self, event: Event) {
        self.0.lock().unwrap().push((Instant::now(), event));
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn timed(&self) -> Vec<(Instant, Event)> {
        self.0.lock().unwrap().clone()
    }
}

/// Registrar that records when it ran and what the context looked like.
pub struct RecordingRegistrar {
    pub recorder: Recorder,
    pub calls: Arc<AtomicUsize>,
    pub readiness: Option<watch::Receiver<bool>>,
}

impl RecordingRegistrar {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            calls: Arc::new(AtomicUsize::new(0)),
            readiness: None,
        }
    }

    pub fn with_readiness(mut self, readiness: watch::Receiver<bool>) -> Self {
        self.readiness = Some(readiness);
        self
    }
}

impl ServiceRegistrar for RecordingRegistrar {
    fn add_service(&self, router: Router, context: &Arc<QofContext>) -> Router {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorder.record(Event::HandlersAttached {
            context_ready_at: context.ready_at(),
        });
        router
    }

    fn readiness(&self) -> Option<watch::Receiver<bool>> {
        self.readiness.clone()
    }
}

/// How the fake builder and server behave.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Behavior {
    #[default]
    Serve,
    NoServer,
    ServerWithWarning,
    ServeFails,
}

pub struct RecordingBuilder {
    pub recorder: Recorder,
    pub behavior: Behavior,
}

impl RecordingBuilder {
    pub fn new(recorder: &Recorder, behavior: Behavior) -> Self {
        Self {
            recorder: recorder.clone(),
            behavior,
        }
    }
}

pub struct FakeServer {
    recorder: Recorder,
    fail: bool,
}

impl ServerBuilder for RecordingBuilder {
    type Server = FakeServer;

    fn new_server(
        &self,
        addr: &str,
        key_log_path: &Path,
        _router: Router,
    ) -> Result<NewServer<FakeServer>, ServerError> {
        self.recorder.record(Event::ServerBuilt {
            addr: addr.to_string(),
            key_log: key_log_path.to_path_buf(),
        });

        let warning = match self.behavior {
            Behavior::NoServer => {
                return Err(ServerError::Address {
                    addr: addr.to_string(),
                    source: "bad".parse::<std::net::IpAddr>().unwrap_err(),
                });
            }
            Behavior::ServerWithWarning => Some(ServerError::KeyLog {
                path: key_log_path.to_path_buf(),
                source: std::io::Error::other("read-only filesystem"),
            }),
            _ => None,
        };

        Ok(NewServer {
            server: FakeServer {
                recorder: self.recorder.clone(),
                fail: self.behavior == Behavior::ServeFails,
            },
            warning,
        })
    }
}

impl FakeServer {
    fn outcome(&self) -> Result<(), ServerError> {
        if self.fail {
            Err(ServerError::Serve(std::io::Error::other("accept loop died")))
        } else {
            Ok(())
        }
    }
}

impl SbiServer for FakeServer {
    async fn listen_and_serve(self) -> Result<(), ServerError> {
        self.recorder.record(Event::ServedPlaintext);
        self.outcome()
    }

    async fn listen_and_serve_tls(self, cert: PathBuf, key: PathBuf) -> Result<(), ServerError> {
        self.recorder.record(Event::ServedTls { cert, key });
        self.outcome()
    }
}

/// Config parsed from TOML text, panicking on error.
pub fn config(text: &str) -> QofConfig {
    qof::config::loader::parse_config(text).unwrap()
}
