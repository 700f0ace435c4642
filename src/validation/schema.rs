//! Schema table and its interpreter.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::result::{FieldError, NormalizedRecord, ValidationResult};
use super::rule::{FieldKind, FieldRule};

/// Programmer errors detected while building a schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("Field '{field}' has min length {min} greater than max length {max}")]
    InvertedBounds { field: String, min: usize, max: usize },

    #[error("Field '{field}' is a {kind} but declares string normalizers or checks")]
    StringRuleOnNonString { field: String, kind: &'static str },

    #[error("Field name cannot be empty")]
    EmptyFieldName,
}

/// An ordered, immutable table of field rules.
///
/// Built once and shared read-only; [`Schema::validate`] takes `&self` and
/// keeps all per-call state on the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    name: String,
    fields: Vec<FieldRule>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    /// Validates and normalizes `input` against the table.
    ///
    /// Every field is checked independently and contributes at most one
    /// error, in declaration order. Keys not declared by the schema are
    /// ignored. A non-object input is treated as an empty object.
    pub fn validate(&self, input: &Value) -> ValidationResult {
        let object = input.as_object();
        let mut record = NormalizedRecord::new();
        let mut errors = Vec::new();

        for rule in &self.fields {
            let raw = object.and_then(|map| map.get(&rule.name));
            match Self::validate_field(rule, raw) {
                FieldOutcome::Accepted(value) => record.insert(&rule.name, value),
                FieldOutcome::Skipped => {}
                FieldOutcome::Rejected(message) => {
                    errors.push(FieldError::new(rule.name.as_str(), message));
                }
            }
        }

        if errors.is_empty() {
            ValidationResult::Success(record)
        } else {
            ValidationResult::Failure(errors)
        }
    }

    fn validate_field(rule: &FieldRule, raw: Option<&Value>) -> FieldOutcome {
        let Some(raw) = raw else {
            return if rule.required {
                FieldOutcome::Rejected(rule.required_message.clone())
            } else {
                FieldOutcome::Skipped
            };
        };

        if !rule.kind.matches(raw) {
            return FieldOutcome::Rejected(rule.invalid_type_message.clone());
        }

        let candidate = rule.normalize(raw);
        match rule.first_failure(&candidate) {
            Some(message) => FieldOutcome::Rejected(message.to_string()),
            None => FieldOutcome::Accepted(candidate),
        }
    }
}

enum FieldOutcome {
    Accepted(Value),
    Skipped,
    Rejected(String),
}

/// Collects field rules and checks them for consistency.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldRule>,
}

impl SchemaBuilder {
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] for duplicate or empty field names, inverted
    /// length bounds, or string-only rules on non-string fields.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut seen = HashSet::new();

        for rule in &self.fields {
            if rule.name.is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(SchemaError::DuplicateField(rule.name.clone()));
            }
            if rule.kind != FieldKind::String
                && (!rule.normalizers.is_empty() || !rule.checks.is_empty())
            {
                return Err(SchemaError::StringRuleOnNonString {
                    field: rule.name.clone(),
                    kind: rule.kind.as_str(),
                });
            }
            if let (Some(min), Some(max)) = (rule.min_length_bound(), rule.max_length_bound()) {
                if min > max {
                    return Err(SchemaError::InvertedBounds {
                        field: rule.name.clone(),
                        min,
                        max,
                    });
                }
            }
        }

        Ok(Schema {
            name: self.name,
            fields: self.fields,
        })
    }
}
