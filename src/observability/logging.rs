//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide tracing subscriber
//! - Hold the live per-target level directives and caller flags
//! - Reload the level filter when a subsystem level changes
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Base filter from `RUST_LOG`, per-subsystem directives layered on top
//! - Caller location is chosen per target by two fmt layers with dynamic filters

use std::collections::BTreeMap;
use std::io::{self, IsTerminal};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, Layer, Registry};

use crate::observability::cascade::Severity;

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Error raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("global subscriber already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Live logging state shared by all subsystems.
///
/// Without a reload handle (tests, library embedding) it still tracks levels
/// and caller flags; it just has no filter to push them into.
pub struct LogControl {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
    base: String,
    levels: RwLock<BTreeMap<String, Severity>>,
    callers: RwLock<BTreeMap<String, bool>>,
}

impl LogControl {
    /// Control state not attached to any subscriber.
    pub fn detached() -> Self {
        Self::with_handle(None, DEFAULT_DIRECTIVE.to_string())
    }

    fn with_handle(handle: Option<reload::Handle<EnvFilter, Registry>>, base: String) -> Self {
        Self {
            handle,
            base,
            levels: RwLock::new(BTreeMap::new()),
            callers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Set the level of `target` and reload the filter.
    pub fn set_level(&self, target: &str, level: Severity) {
        self.levels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.to_string(), level);

        let Some(handle) = &self.handle else {
            return;
        };

        let directives = self.directives();
        match EnvFilter::try_new(&directives) {
            Ok(filter) => {
                if let Err(e) = handle.reload(filter) {
                    tracing::warn!(error = %e, "Failed to reload log filter");
                }
            }
            Err(e) => {
                tracing::warn!(directives = %directives, error = %e, "Rejected log filter");
            }
        }
    }

    /// Set whether events from `target` print their caller location.
    pub fn set_report_caller(&self, target: &str, enabled: bool) {
        self.callers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.to_string(), enabled);
    }

    /// Whether an event with this target prints its caller location.
    ///
    /// The longest registered target that is a module prefix of `target` wins.
    pub fn report_caller(&self, target: &str) -> bool {
        let callers = self.callers.read().unwrap_or_else(PoisonError::into_inner);
        callers
            .iter()
            .filter(|(prefix, _)| covers(prefix, target))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, enabled)| *enabled)
            .unwrap_or(false)
    }

    /// Current filter directives: base first, then one per subsystem target.
    pub fn directives(&self) -> String {
        let levels = self.levels.read().unwrap_or_else(PoisonError::into_inner);
        let mut directives = vec![self.base.clone()];
        directives.extend(
            levels
                .iter()
                .map(|(target, level)| format!("{}={}", target, level.as_directive())),
        );
        directives.join(",")
    }
}

fn covers(prefix: &str, target: &str) -> bool {
    target == prefix
        || target
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Install the global subscriber and return the control handle.
pub fn init() -> Result<Arc<LogControl>, LogInitError> {
    let base = std::env::var("RUST_LOG")
        .ok()
        .filter(|value| EnvFilter::try_new(value).is_ok())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string());

    let ansi = io::stdout().is_terminal();
    let (subscriber, control) = build_subscriber(&base, io::stdout, ansi);
    subscriber.try_init()?;

    Ok(control)
}

/// Build the reloadable subscriber without installing it.
///
/// Events go to `make_writer`, colored when `ansi` is set. The returned
/// control drives the level filter and the caller split of this subscriber
/// only.
pub fn build_subscriber<W>(
    base: &str,
    make_writer: W,
    ansi: bool,
) -> (impl Subscriber + Send + Sync + 'static, Arc<LogControl>)
where
    W: for<'w> MakeWriter<'w> + Clone + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(EnvFilter::new(base));
    let control = Arc::new(LogControl::with_handle(Some(handle), base.to_string()));

    let with_caller = Arc::clone(&control);
    let without_caller = Arc::clone(&control);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(make_writer.clone())
                .with_ansi(ansi)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_fn(move |meta| with_caller.report_caller(meta.target()))),
        )
        .with(
            fmt::layer()
                .with_writer(make_writer)
                .with_ansi(ansi)
                .with_filter(filter_fn(move |meta| !without_caller.report_caller(meta.target()))),
        );

    (subscriber, control)
}
