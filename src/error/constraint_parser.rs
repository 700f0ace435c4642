use regex::Regex;
use std::sync::LazyLock;

/// Utility for parsing PostgreSQL unique-constraint violation messages.
///
/// The store only declares unique constraints (`accounts_username_key`,
/// `accounts_email_key`), so this is the only shape that needs parsing.
pub struct ConstraintParser;

/// `Key (field)=(value)` in PostgreSQL detail lines
static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("key/value pattern compiles")
});

/// Table or relation name in quotes
static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:table|relation) "([^"]+)""#).expect("table pattern compiles")
});

impl ConstraintParser {

    /// Parses a unique constraint violation into `(entity, field, value)`.
    ///
    /// The constraint name is preferred (`{table}_{column}_key`); the
    /// `Key (col)=(value)` detail line supplies the value, or the whole triple
    /// when no constraint name is available.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = Self::extract_key_value_from_message(message)
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = Self::extract_key_value_from_message(message)?;
        let entity = Self::extract_table_from_message(message)
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Splits a `{table}_{column}_key` constraint name.
    ///
    /// The table is the first segment, so multi-word columns survive
    /// (`accounts_first_name_key` → `("accounts", "first_name")`).
    pub fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = constraint
            .strip_suffix("_key")
            .or_else(|| constraint.strip_suffix("_unique"))?;
        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    /// Extracts `(column, value)` from a `Key (column)=(value)` detail line.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let captures = KEY_VALUE.captures(message)?;
        Some((captures[1].to_string(), captures[2].to_string()))
    }

    fn extract_table_from_message(message: &str) -> Option<String> {
        TABLE_NAME
            .captures(message)
            .map(|c| c[1].to_string())
    }
}
