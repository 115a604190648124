//! Per-subsystem log level cascade.
//!
//! The QoF links a fixed set of subsystems whose verbosity is configured
//! independently under `[logger.<name>]`. At startup every subsystem gets
//! a level and a caller-location flag:
//!
//! ```text
//! no policy            → warn, level = info, caller = subsystem default
//! empty level          → warn, level = info, caller = configured or default
//! unparsable level     → warn (names value), level = info, caller = ...
//! valid level          → info, level = parsed, caller = ...
//! ```
//!
//! Nothing here fails: every problem degrades to a warning plus the default.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::{LogSetting, LoggerConfig};
use crate::observability::logging::LogControl;

/// Level applied whenever a subsystem has no usable configured level.
pub const DEFAULT_SEVERITY: Severity = Severity::Info;

/// Logging severity, least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Panic = 6,
}

impl Severity {
    /// Every severity, in order.
    pub const ALL: [Severity; 7] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Panic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
        }
    }

    /// Equivalent `EnvFilter` level. tracing tops out at `error`.
    pub fn as_directive(self) -> &'static str {
        match self {
            Severity::Fatal | Severity::Panic => "error",
            other => other.as_str(),
        }
    }

    fn from_u8(value: u8) -> Self {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .unwrap_or(DEFAULT_SEVERITY)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A level string outside the severity enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid log level: {0:?}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "panic" => Ok(Severity::Panic),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// A subsystem whose verbosity can be set independently.
pub trait SubsystemLogger: Send + Sync {
    /// Key under `[logger]`.
    fn name(&self) -> &str;

    fn set_level(&self, level: Severity);

    fn set_report_caller(&self, enabled: bool);

    /// Caller flag applied when the policy leaves it unset.
    fn default_report_caller(&self) -> bool {
        false
    }

    /// Effective level.
    fn level(&self) -> Severity;

    /// Effective caller flag.
    fn report_caller(&self) -> bool;
}

/// Subsystem names, tracing targets, and default caller flags.
///
/// `core` is this crate; the rest are the protocol and utility libraries the
/// network function links.
pub const SUBSYSTEMS: [(&str, &str, bool); 6] = [
    ("core", "qof", false),
    ("nas", "nas", false),
    ("ngap", "ngap", false),
    ("aper", "aper", false),
    ("path_util", "path_util", false),
    ("openapi", "openapi", false),
];

/// A registered subsystem backed by a tracing target.
pub struct Subsystem {
    name: &'static str,
    target: &'static str,
    default_report_caller: bool,
    level: AtomicU8,
    report_caller: AtomicBool,
    control: Arc<LogControl>,
}

impl Subsystem {
    pub fn new(
        name: &'static str,
        target: &'static str,
        default_report_caller: bool,
        control: Arc<LogControl>,
    ) -> Self {
        Self {
            name,
            target,
            default_report_caller,
            level: AtomicU8::new(DEFAULT_SEVERITY as u8),
            report_caller: AtomicBool::new(default_report_caller),
            control,
        }
    }

    /// Tracing target whose filter directive this subsystem owns.
    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl SubsystemLogger for Subsystem {
    fn name(&self) -> &str {
        self.name
    }

    fn set_level(&self, level: Severity) {
        self.level.store(level as u8, Ordering::SeqCst);
        self.control.set_level(self.target, level);
    }

    fn set_report_caller(&self, enabled: bool) {
        self.report_caller.store(enabled, Ordering::SeqCst);
        self.control.set_report_caller(self.target, enabled);
    }

    fn default_report_caller(&self) -> bool {
        self.default_report_caller
    }

    fn level(&self) -> Severity {
        Severity::from_u8(self.level.load(Ordering::SeqCst))
    }

    fn report_caller(&self) -> bool {
        self.report_caller.load(Ordering::SeqCst)
    }
}

/// Applies `[logger]` policy to a closed set of subsystems.
pub struct LogCascade {
    subsystems: Vec<Arc<dyn SubsystemLogger>>,
}

impl LogCascade {
    /// Cascade over an explicit subsystem list, applied in order.
    pub fn new(subsystems: Vec<Arc<dyn SubsystemLogger>>) -> Self {
        Self { subsystems }
    }

    /// Cascade over the built-in [`SUBSYSTEMS`].
    pub fn standard(control: Arc<LogControl>) -> Self {
        let subsystems = SUBSYSTEMS
            .iter()
            .map(|&(name, target, default_caller)| {
                Arc::new(Subsystem::new(name, target, default_caller, Arc::clone(&control)))
                    as Arc<dyn SubsystemLogger>
            })
            .collect();
        Self::new(subsystems)
    }

    pub fn subsystems(&self) -> &[Arc<dyn SubsystemLogger>] {
        &self.subsystems
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn SubsystemLogger>> {
        self.subsystems.iter().find(|s| s.name() == name)
    }

    /// Apply `logger` to every subsystem. Idempotent; never fails.
    ///
    /// Every diagnostic is emitted before any level changes: `core` owns this
    /// crate's target, so a restrictive `core` level would otherwise hide the
    /// warnings about the subsystems after it.
    pub fn apply(&self, logger: &LoggerConfig) {
        let resolved: Vec<_> = self
            .subsystems
            .iter()
            .map(|subsystem| {
                let policy = resolve(subsystem.as_ref(), logger.get(subsystem.name()));
                (subsystem, policy)
            })
            .collect();

        for name in logger.keys() {
            if self.get(name).is_none() {
                tracing::warn!(subsystem = %name, "Log setting for unknown subsystem ignored");
            }
        }

        for (subsystem, (level, report_caller)) in resolved {
            subsystem.set_level(level);
            subsystem.set_report_caller(report_caller);
        }
    }
}

/// Level and caller flag for one subsystem, logging any fallback.
fn resolve(subsystem: &dyn SubsystemLogger, setting: Option<&LogSetting>) -> (Severity, bool) {
    let name = subsystem.name();

    let Some(setting) = setting else {
        tracing::warn!(
            subsystem = %name,
            "No log level configured, set to [{}] level",
            DEFAULT_SEVERITY
        );
        return (DEFAULT_SEVERITY, subsystem.default_report_caller());
    };

    let level = match setting.debug_level.as_deref().map(str::trim) {
        None | Some("") => {
            tracing::warn!(
                subsystem = %name,
                "No log level configured, set to [{}] level",
                DEFAULT_SEVERITY
            );
            DEFAULT_SEVERITY
        }
        Some(value) => match value.parse::<Severity>() {
            Ok(level) => {
                tracing::info!(subsystem = %name, "Log level is set to [{}] level", level);
                level
            }
            Err(_) => {
                tracing::warn!(
                    subsystem = %name,
                    "Log level [{}] is invalid, set to [{}] level",
                    value,
                    DEFAULT_SEVERITY
                );
                DEFAULT_SEVERITY
            }
        },
    };

    let report_caller = setting
        .report_caller
        .unwrap_or_else(|| subsystem.default_report_caller());
    (level, report_caller)
}
