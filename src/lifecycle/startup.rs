//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration, apply logging policy, check the config version
//! - Initialize the run-time context before anything can be served
//! - Arm the termination watcher, attach handlers, open the listener
//!
//! # Design Decisions
//! - Fail fast: config, listener construction, and serve errors are fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener starts last, after the registrar is ready (or a fixed delay)

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cli::Cli;
use crate::config::paths::{self, DEFAULT_CONFIG_PATH, DEFAULT_KEY_LOG_PATH};
use crate::config::{check_config_version, load_config, ConfigError, QofConfig, Scheme};
use crate::context::QofContext;
use crate::http::{self, HttpServerBuilder, SbiServer, ServerBuilder, ServerError};
use crate::lifecycle::shutdown::Terminator;
use crate::lifecycle::signals;
use crate::observability::LogCascade;
use crate::producer::{QofProducer, ServiceRegistrar};

/// Pause before listening when the registrar offers no readiness signal.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Upper bound on waiting for a registrar's readiness signal.
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(10);

/// Error raised while initializing from configuration.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to load config {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Version(ConfigError),
}

/// Error that ends `start`.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("initialize HTTP server failed: {0}")]
    ServerInit(#[source] ServerError),

    #[error("HTTP server setup failed: {0}")]
    Serve(#[source] ServerError),
}

/// Lifecycle orchestrator of the QoF network function.
pub struct Qof<R = QofProducer, B = HttpServerBuilder> {
    config: Arc<QofConfig>,
    registrar: R,
    builder: B,
    terminator: Arc<Terminator>,
    key_log_path: PathBuf,
    settle_delay: Duration,
    readiness_timeout: Duration,
    watch_signals: bool,
}

impl Qof {
    /// Orchestrator over an already-loaded configuration.
    pub fn new(config: QofConfig) -> Self {
        Self {
            config: Arc::new(config),
            registrar: QofProducer,
            builder: HttpServerBuilder,
            terminator: Arc::new(Terminator::new()),
            key_log_path: paths::install_path(DEFAULT_KEY_LOG_PATH),
            settle_delay: SETTLE_DELAY,
            readiness_timeout: READINESS_TIMEOUT,
            watch_signals: true,
        }
    }

    /// Load config from the CLI (or default) path, cascade log levels, and
    /// check the config version, in that order.
    pub fn initialize(cli: &Cli, cascade: &LogCascade) -> Result<Self, InitError> {
        if let Some(common) = cli.common_config() {
            tracing::debug!(path = %common, "Common config path supplied");
        }

        let path = cli
            .component_config()
            .map(PathBuf::from)
            .unwrap_or_else(|| paths::install_path(DEFAULT_CONFIG_PATH));

        let config = Self::load(&path)?;
        cascade.apply(&config.logger);
        check_config_version(&config).map_err(InitError::Version)?;

        Ok(Self::new(config))
    }

    fn load(path: &Path) -> Result<QofConfig, InitError> {
        let config = load_config(path).map_err(|source| InitError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }
}

impl<R, B> Qof<R, B>
where
    R: ServiceRegistrar,
    B: ServerBuilder,
{
    /// Replace the service registrar.
    pub fn with_registrar<R2: ServiceRegistrar>(self, registrar: R2) -> Qof<R2, B> {
        Qof {
            config: self.config,
            registrar,
            builder: self.builder,
            terminator: self.terminator,
            key_log_path: self.key_log_path,
            settle_delay: self.settle_delay,
            readiness_timeout: self.readiness_timeout,
            watch_signals: self.watch_signals,
        }
    }

    /// Replace the server builder.
    pub fn with_server_builder<B2: ServerBuilder>(self, builder: B2) -> Qof<R, B2> {
        Qof {
            config: self.config,
            registrar: self.registrar,
            builder,
            terminator: self.terminator,
            key_log_path: self.key_log_path,
            settle_delay: self.settle_delay,
            readiness_timeout: self.readiness_timeout,
            watch_signals: self.watch_signals,
        }
    }

    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = Arc::new(terminator);
        self
    }

    pub fn with_key_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_log_path = path.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_readiness_timeout(mut self, timeout: Duration) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    /// Skip arming the OS signal watcher (embedding, tests).
    pub fn without_signal_watcher(mut self) -> Self {
        self.watch_signals = false;
        self
    }

    pub fn config(&self) -> &QofConfig {
        &self.config
    }

    pub fn terminator(&self) -> &Arc<Terminator> {
        &self.terminator
    }

    /// Explicit shutdown. Same sequence the signal watcher runs.
    pub fn terminate(&self) -> bool {
        self.terminator.terminate()
    }

    /// Bring the service up and serve until the listener stops.
    pub async fn start(&self) -> Result<(), StartError> {
        let mut context = QofContext::init(&self.config);
        context.init_default_slices();
        let context = Arc::new(context);

        tracing::info!("Server started");
        let router = http::new_router();

        if self.watch_signals {
            signals::arm_termination_watcher(Arc::clone(&self.terminator));
        }

        let router = self.registrar.add_service(router, &context);
        let router = http::finish_router(router);

        self.settle().await;

        let addr = context.sbi_addr().to_string();
        let built = self
            .builder
            .new_server(&addr, &self.key_log_path, router)
            .map_err(|e| {
                tracing::error!(error = %e, "Initialize HTTP server failed");
                StartError::ServerInit(e)
            })?;

        if let Some(warning) = &built.warning {
            tracing::warn!(error = %warning, "Initialize HTTP server");
        }

        let sbi = &self.config.configuration.sbi;
        let served = match sbi.scheme {
            Scheme::Http => built.server.listen_and_serve().await,
            Scheme::Https => {
                let tls = sbi.tls_paths();
                built.server.listen_and_serve_tls(tls.pem, tls.key).await
            }
        };

        served.map_err(|e| {
            tracing::error!(error = %e, "HTTP server setup failed");
            StartError::Serve(e)
        })
    }

    async fn settle(&self) {
        let Some(mut ready) = self.registrar.readiness() else {
            tokio::time::sleep(self.settle_delay).await;
            return;
        };

        let outcome = tokio::time::timeout(self.readiness_timeout, ready.wait_for(|ready| *ready))
            .await
            .map(|waited| waited.map(|_| ()));

        match outcome {
            Ok(Ok(())) => tracing::debug!("Service registrar ready"),
            Ok(Err(_)) => tracing::warn!("Readiness signal dropped before ready, continuing"),
            Err(_) => tracing::warn!(
                timeout_ms = self.readiness_timeout.as_millis() as u64,
                "Service registrar not ready in time, continuing"
            ),
        }
    }
}
