//! Declarative request validation.
//!
//! A [`Schema`] is an ordered table of [`FieldRule`]s interpreted by
//! [`Schema::validate`]. Validation is a pure computation: no logging, no I/O,
//! and no shared mutable state, so schemas can be shared across tasks freely.

mod result;
mod rule;
mod schema;
pub mod schemas;

pub use result::{FieldError, NormalizedRecord, ValidationResult};
pub use rule::{Check, FieldCheck, FieldKind, FieldRule, Normalizer};
pub use schema::{Schema, SchemaBuilder, SchemaError};
pub use schemas::{LoginData, SignupData};
