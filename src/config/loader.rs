//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::QofConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Configuration schema version this build understands.
pub const EXPECTED_CONFIG_VERSION: &str = "1.0.0";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("config version is [{found}], but expected is [{expected}]")]
    VersionMismatch { expected: String, found: String },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<QofConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<QofConfig, ConfigError> {
    let config: QofConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Reject a configuration written for another schema version.
pub fn check_config_version(config: &QofConfig) -> Result<(), ConfigError> {
    if config.info.version != EXPECTED_CONFIG_VERSION {
        return Err(ConfigError::VersionMismatch {
            expected: EXPECTED_CONFIG_VERSION.to_string(),
            found: config.info.version.clone(),
        });
    }

    tracing::info!(version = %config.info.version, "Config version checked");
    Ok(())
}
