//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the QoF.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Root configuration for the network function.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct QofConfig {
    /// Document metadata (version is checked at startup).
    pub info: Info,

    /// Service configuration (SBI binding, slices).
    pub configuration: Configuration,

    /// Per-subsystem logging policy, keyed by subsystem name.
    pub logger: LoggerConfig,
}

/// Logging section: subsystem name to policy.
pub type LoggerConfig = BTreeMap<String, LogSetting>;

/// Document metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Info {
    /// Configuration schema version (e.g., "1.0.0").
    pub version: String,

    /// Free-form description.
    pub description: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            version: crate::config::loader::EXPECTED_CONFIG_VERSION.to_string(),
            description: "QOF initial local configuration".to_string(),
        }
    }
}

/// Network function configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Configuration {
    /// NF name advertised in the profile.
    pub qof_name: String,

    /// Service-based interface binding.
    pub sbi: SbiConfig,

    /// Slices served by default. Empty means the built-in default slice.
    pub snssai_list: Vec<Snssai>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            qof_name: "QOF".to_string(),
            sbi: SbiConfig::default(),
            snssai_list: Vec::new(),
        }
    }
}

/// Service-based interface (SBI) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SbiConfig {
    /// Transport scheme for the listener.
    pub scheme: Scheme,

    /// Address other NFs use to reach us.
    pub register_ipv4: IpAddr,

    /// Address the listener binds to.
    pub binding_ipv4: IpAddr,

    /// Listener port.
    pub port: u16,

    /// TLS material. Falls back to install-root defaults when absent.
    pub tls: Option<TlsPaths>,
}

impl Default for SbiConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Http,
            register_ipv4: IpAddr::V4(Ipv4Addr::LOCALHOST),
            binding_ipv4: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            tls: None,
        }
    }
}

impl SbiConfig {
    /// Certificate and key paths to serve TLS with.
    pub fn tls_paths(&self) -> TlsPaths {
        self.tls.clone().unwrap_or_else(|| TlsPaths {
            pem: paths::install_path(paths::DEFAULT_PEM_PATH),
            key: paths::install_path(paths::DEFAULT_KEY_PATH),
        })
    }
}

/// Listener transport scheme. Closed set; anything else fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// TLS certificate and private key (PEM).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TlsPaths {
    pub pem: PathBuf,
    pub key: PathBuf,
}

/// Single network slice selection assistance information.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Snssai {
    /// Slice/service type.
    pub sst: u8,

    /// Slice differentiator, 6 hex digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sd: Option<String>,
}

/// Logging policy for one subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSetting {
    /// Severity name. Missing or empty means the default level.
    #[serde(alias = "level")]
    pub debug_level: Option<String>,

    /// Include file/line in log lines. Missing means the subsystem's default.
    pub report_caller: Option<bool>,
}
