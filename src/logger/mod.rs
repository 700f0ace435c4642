//! Logger Module
//!
//! Sets up `tracing-subscriber` with:
//! - Console output, colored only when stdout is a terminal
//! - Optional file output in Full, Compact or JSON format

pub mod config;
pub mod error;
pub(crate) mod writer;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::LogFileWriter;

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    match (config.console.enabled, config.file.enabled) {
        (true, true) => init_both(&config, filter),
        (true, false) => init_console_only(&config.console, filter),
        (false, true) => init_file_only(&config.file, filter),
        (false, false) => Err(LoggerError::config(
            "At least one output (console or file) must be enabled",
        )),
    }
}

fn already_initialized(e: impl std::fmt::Display) -> LoggerError {
    LoggerError::Init {
        message: e.to_string(),
    }
}

fn init_console_only(config: &ConsoleConfig, filter: EnvFilter) -> Result<(), LoggerError> {
    let use_ansi = config.colored && std::io::stdout().is_terminal();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(already_initialized)
}

fn init_file_only(config: &FileConfig, filter: EnvFilter) -> Result<(), LoggerError> {
    let writer = LogFileWriter::new(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(false).with_writer(writer))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().with_ansi(false).compact().with_writer(writer))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json().with_writer(writer))
            .try_init(),
    }
    .map_err(already_initialized)
}

fn console_layer<S>(use_ansi: bool) -> fmt::Layer<S> {
    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
}

fn init_both(config: &LoggerConfig, filter: EnvFilter) -> Result<(), LoggerError> {
    let use_ansi = config.console.colored && std::io::stdout().is_terminal();
    let writer = LogFileWriter::new(&config.file)?;

    // File layer goes first so console ANSI codes do not leak into span fields
    // written to the file (tokio-rs/tracing#1817).
    let registry = tracing_subscriber::registry().with(filter);
    match config.file.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(false).with_writer(writer))
            .with(console_layer(use_ansi))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().with_ansi(false).compact().with_writer(writer))
            .with(console_layer(use_ansi))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json().with_writer(writer))
            .with(console_layer(use_ansi))
            .try_init(),
    }
    .map_err(already_initialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn both_outputs(dir: &TempDir, format: LogFormat) -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig::new(true, false),
            file: FileConfig {
                enabled: true,
                path: dir.path().join(format!("{}.log", format.as_str())),
                append: true,
                format,
            },
            level: "info".to_string(),
        }
    }

    // Only one global subscriber can be installed per process, so every call
    // after the first reports `Init` instead of succeeding.
    #[test]
    fn test_init_both_accepts_every_file_format() {
        let dir = TempDir::new().unwrap();
        for format in [LogFormat::Full, LogFormat::Compact, LogFormat::Json] {
            let config = both_outputs(&dir, format);
            let filter = EnvFilter::new(&config.level);
            match init_both(&config, filter) {
                Ok(()) | Err(LoggerError::Init { .. }) => {}
                Err(other) => panic!("{:?} failed: {}", config.file.format, other),
            }
            assert!(config.file.path.exists());
        }
    }

    #[test]
    fn test_init_logger_rejects_disabled_outputs() {
        let config = LoggerConfig {
            console: ConsoleConfig::new(false, false),
            ..Default::default()
        };
        assert!(init_logger(config).is_err());
    }
}
