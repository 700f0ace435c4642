//! Errors raised while loading or checking settings

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// `default.toml` or the file given by `--config` is absent
    #[error("Required configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error(
        "ACCOUNT_CONFIG_DIR and ACCOUNT_CONFIG_FILE cannot both be set. Use \
         ACCOUNT_CONFIG_DIR for layered configuration or ACCOUNT_CONFIG_FILE \
         for a single configuration file."
    )]
    ConflictingSources,

    /// A setting holds a value outside its accepted range
    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// Reading, merging or deserializing the sources failed
    #[error("Failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
