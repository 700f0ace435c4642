//! Outcome of running a schema against a request body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// One rejected field and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Input key the error refers to
    #[schema(example = "firstName")]
    pub field: String,
    /// Human-readable message from the schema
    #[schema(example = "Must be at least 3 Characters long")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Field name → normalized value, holding only fields declared by the schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord(Map<String, Value>);

impl NormalizedRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub(crate) fn insert(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Converts back into a JSON object, e.g. to feed it through a schema again.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Deserializes the record into a typed payload.
    pub fn into_typed<T: DeserializeOwned>(self) -> serde_json::Result<T> {
        serde_json::from_value(self.into_value())
    }
}

/// Either a normalized record or the ordered list of field errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Success(NormalizedRecord),
    Failure(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success(_))
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationResult::Success(_) => &[],
            ValidationResult::Failure(errors) => errors,
        }
    }

    pub fn record(&self) -> Option<&NormalizedRecord> {
        match self {
            ValidationResult::Success(record) => Some(record),
            ValidationResult::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<NormalizedRecord, Vec<FieldError>> {
        match self {
            ValidationResult::Success(record) => Ok(record),
            ValidationResult::Failure(errors) => Err(errors),
        }
    }
}
