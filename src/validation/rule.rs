//! Field rules: the rows of a schema table.
//!
//! A [`FieldRule`] is plain data. It is built with chained constructors for
//! readability, but the result is an ordinary struct that serializes to JSON
//! and is interpreted by [`Schema::validate`](super::Schema::validate).

use serde::Serialize;
use serde_json::Value;
use validator::ValidateEmail;

/// Primitive type a field value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldKind {
    /// Returns true when the JSON value has this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
        }
    }
}

/// Deterministic transform applied to a well-typed string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalizer {
    Trim,
    Lowercase,
}

impl Normalizer {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Normalizer::Trim => value.trim().to_string(),
            Normalizer::Lowercase => value.to_lowercase(),
        }
    }
}

/// Predicate run against a normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Check {
    /// At least this many characters
    MinLength(usize),
    /// At most this many characters
    MaxLength(usize),
    /// Email address shape
    Email,
}

impl Check {
    /// Returns true when the value passes.
    ///
    /// Lengths count Unicode scalar values, not bytes.
    pub fn passes(&self, value: &Value) -> bool {
        match (self, value) {
            (Check::MinLength(min), Value::String(s)) => s.chars().count() >= *min,
            (Check::MaxLength(max), Value::String(s)) => s.chars().count() <= *max,
            (Check::Email, Value::String(s)) => s.validate_email(),
            // Schema construction only allows string checks on string fields
            _ => false,
        }
    }
}

/// A check paired with the message emitted when it fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCheck {
    pub check: Check,
    pub message: String,
}

/// Validation and normalization rules for one input key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub required_message: String,
    pub invalid_type_message: String,
    pub normalizers: Vec<Normalizer>,
    pub checks: Vec<FieldCheck>,
}

impl FieldRule {
    /// Starts an optional rule of the given kind with generic messages.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            required_message: format!("{} is required", name),
            invalid_type_message: format!("{} must be a {}", name, kind.as_str()),
            name,
            kind,
            required: false,
            normalizers: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Marks the field as required, reporting `message` when it is absent.
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = true;
        self.required_message = message.into();
        self
    }

    /// Overrides the message reported when the value has the wrong type.
    pub fn invalid_type(mut self, message: impl Into<String>) -> Self {
        self.invalid_type_message = message.into();
        self
    }

    pub fn trim(mut self) -> Self {
        self.normalizers.push(Normalizer::Trim);
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.normalizers.push(Normalizer::Lowercase);
        self
    }

    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.check(Check::MinLength(min), message)
    }

    pub fn max_length(self, max: usize, message: impl Into<String>) -> Self {
        self.check(Check::MaxLength(max), message)
    }

    pub fn email(self, message: impl Into<String>) -> Self {
        self.check(Check::Email, message)
    }

    /// Appends a check; checks run in the order they were added.
    pub fn check(mut self, check: Check, message: impl Into<String>) -> Self {
        self.checks.push(FieldCheck {
            check,
            message: message.into(),
        });
        self
    }

    /// Applies the normalizers in declared order.
    ///
    /// Only string values are transformed; other kinds pass through unchanged.
    pub fn normalize(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => {
                let normalized = self
                    .normalizers
                    .iter()
                    .fold(s.clone(), |acc, normalizer| normalizer.apply(&acc));
                Value::String(normalized)
            }
            other => other.clone(),
        }
    }

    /// Returns the message of the first failing check, if any.
    pub fn first_failure(&self, value: &Value) -> Option<&str> {
        self.checks
            .iter()
            .find(|field_check| !field_check.check.passes(value))
            .map(|field_check| field_check.message.as_str())
    }

    pub(crate) fn min_length_bound(&self) -> Option<usize> {
        self.checks.iter().find_map(|c| match c.check {
            Check::MinLength(min) => Some(min),
            _ => None,
        })
    }

    pub(crate) fn max_length_bound(&self) -> Option<usize> {
        self.checks.iter().find_map(|c| match c.check {
            Check::MaxLength(max) => Some(max),
            _ => None,
        })
    }
}
