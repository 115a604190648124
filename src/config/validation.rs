//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic, including the scheme enum)
//! - Validate value ranges (port non-zero, slice differentiator format)
//! - Reject empty TLS paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: QofConfig → Result<(), Vec<ValidationError>>
//! - Logging policy is never validated here: bad levels degrade at apply time

use thiserror::Error;

use crate::config::schema::QofConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("configuration.sbi.port must be non-zero")]
    ZeroPort,

    #[error("configuration.qof_name must not be empty")]
    EmptyName,

    #[error("snssai_list[{index}].sd `{sd}` must be 6 hex digits")]
    InvalidSd { index: usize, sd: String },

    #[error("configuration.sbi.tls.{field} must not be empty")]
    EmptyTlsPath { field: &'static str },
}

/// Run every semantic check and collect all failures.
pub fn validate_config(config: &QofConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let configuration = &config.configuration;

    if configuration.sbi.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if configuration.qof_name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    for (index, snssai) in configuration.snssai_list.iter().enumerate() {
        if let Some(sd) = &snssai.sd {
            if sd.len() != 6 || !sd.chars().all(|c| c.is_ascii_hexdigit()) {
                errors.push(ValidationError::InvalidSd {
                    index,
                    sd: sd.clone(),
                });
            }
        }
    }

    if let Some(tls) = &configuration.sbi.tls {
        if tls.pem.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyTlsPath { field: "pem" });
        }
        if tls.key.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyTlsPath { field: "key" });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
