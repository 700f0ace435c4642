use crate::config::error::ConfigError;
use crate::error::DatabaseErrorConverter;
use crate::validation::FieldError;
use diesel_async::pooled_connection::PoolError;
use serde::Serialize;
use thiserror::Error;

/// Status category attached to a rejected request body.
///
/// Signup answers malformed bodies with `400`, register and login with `422`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStatus {
    BadRequest,
    Unprocessable,
}

/// Application-wide error type that represents all possible errors in the system.
///
/// Expected outcomes (validation, duplicates, unknown accounts) carry enough
/// structure for the HTTP boundary to build a client-facing payload; unexpected
/// failures keep their `anyhow` source for logging.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body rejected by a validation schema
    #[error("Validation failed with {} field error(s)", errors.len())]
    ValidationFailed {
        status: FailureStatus,
        message: String,
        errors: Vec<FieldError>,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// An account matching the signup/register lookup already exists
    #[error("Account already exists with {field}='{value}'")]
    AccountExists { field: String, value: String },

    /// Login lookup found no account
    #[error("Account not found with {field}='{value}'")]
    AccountNotFound { field: String, value: String },

    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error for a single configuration or argument field
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Unauthorized access error with authentication message
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Whether the error is an expected client-side outcome rather than a fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AppError::Database { .. }
                | AppError::Configuration { .. }
                | AppError::ConnectionPool { .. }
                | AppError::Internal { .. }
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<bb8::RunError<PoolError>> for AppError {
    fn from(error: bb8::RunError<PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::anyhow!("Failed to acquire connection: {}", error),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::ValidationError { field, message } => AppError::Validation {
                field,
                reason: message,
            },
            other => AppError::Configuration {
                key: "settings".to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
