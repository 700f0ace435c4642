//! Configuration management module for account-rs
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local development overrides (not committed to version control)
//! 4. `ACCOUNT_*` environment variables
//!
//! A single file given by `ACCOUNT_CONFIG_FILE` or `--config` replaces steps 1-3.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    DatabaseConfig, JwtConfig, LoggerSettings, ServerConfig, Settings, StoreBackend, StoreConfig,
};
