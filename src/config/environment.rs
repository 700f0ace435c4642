//! Deployment environment, which selects the `config/{env}.toml` overlay

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Variable read when `--env` is not given
pub const APP_ENV_VAR: &str = "ACCOUNT_APP_ENV";

/// Set by `--env` on the command line or `ACCOUNT_APP_ENV`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[value(alias = "dev")]
    Development,
    Test,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl Environment {
    /// Reads `ACCOUNT_APP_ENV`. Unset or blank means `Development`; any
    /// other unknown value is an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(APP_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => Self::parse(&value),
            _ => Ok(Self::default()),
        }
    }

    /// Case-insensitive parse accepting the same names and aliases as `--env`
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        <Self as ValueEnum>::from_str(value.trim(), true).map_err(|_| {
            let valid: Vec<&str> = Self::value_variants().iter().map(Self::as_str).collect();
            ConfigError::validation(
                APP_ENV_VAR,
                format!("Unknown environment '{}'. Expected one of: {}", value, valid.join(", ")),
            )
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Name of the overlay file layered over `default.toml`
    pub fn overlay_file(&self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_cli_names_and_aliases() {
        for (input, expected) in [
            ("dev", Environment::Development),
            ("Test", Environment::Test),
            ("stage", Environment::Staging),
            (" PROD ", Environment::Production),
        ] {
            assert_eq!(Environment::parse(input).unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn test_parse_unknown_names_the_variable() {
        match Environment::parse("qa") {
            Err(ConfigError::ValidationError { field, message }) => {
                assert_eq!(field, APP_ENV_VAR);
                assert!(message.contains("development, test, staging, production"));
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_overlay_file() {
        assert_eq!(Environment::Staging.overlay_file(), "staging.toml");
        assert_eq!(Environment::default().to_string(), "development");
    }
}
