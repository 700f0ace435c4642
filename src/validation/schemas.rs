//! Built-in request schemas for the account flows.
//!
//! Each schema is built once on first use and shared for the life of the
//! process. A malformed table panics at that first use.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::rule::FieldRule;
use super::schema::Schema;

pub const SIGNUP: &str = "signup";
pub const REGISTER: &str = "register";
pub const LOGIN: &str = "login";

static SIGNUP_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder(SIGNUP)
        .field(
            FieldRule::string("firstName")
                .required("firstname is required")
                .invalid_type("firstname must be a string")
                .trim()
                .lowercase()
                .min_length(3, "Must be at least 3 Characters long")
                .max_length(30, "firstName must not be longer than 30 characters"),
        )
        .field(
            FieldRule::string("lastName")
                .required("lastname is required")
                .invalid_type("lastname must be a string")
                .trim()
                .lowercase()
                .min_length(3, "LastName must be at least 3 Characters long")
                .max_length(30, "LastName must not be longer than 30 characters"),
        )
        .field(
            FieldRule::string("username")
                .required("Username is required")
                .invalid_type("Username must be a string")
                .trim()
                .lowercase()
                .min_length(3, "Username must be at least 3 Characters long"),
        )
        .field(
            FieldRule::string("email")
                .required("Email is required")
                .invalid_type("Email must be a string")
                .trim()
                .lowercase()
                .email("Invalid email address"),
        )
        .field(
            FieldRule::string("password")
                .required("Password is required")
                .invalid_type("Password must be a string")
                .trim(),
        )
        .build()
        .expect("signup schema is well-formed")
});

static REGISTER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder(REGISTER)
        .field(
            FieldRule::string("firstName")
                .required("First name is required")
                .invalid_type("First name must be a string")
                .trim()
                .lowercase()
                .min_length(3, "First name must be at least 3 characters long")
                .max_length(30, "First name must not be longer than 30 characters"),
        )
        .field(
            FieldRule::string("lastName")
                .required("Last name is required")
                .invalid_type("Last name must be a string")
                .trim()
                .lowercase()
                .min_length(3, "Last name must be at least 3 characters long")
                .max_length(30, "Last name must not be longer than 30 characters"),
        )
        .field(
            FieldRule::string("username")
                .required("Username is required")
                .invalid_type("Username must be a string")
                .trim()
                .lowercase()
                .min_length(3, "Username must be at least 3 characters long"),
        )
        .field(
            FieldRule::string("email")
                .required("Email is required")
                .invalid_type("Email must be a string")
                .trim()
                .lowercase()
                .email("Invalid email address"),
        )
        .field(
            FieldRule::string("password")
                .required("Password is required")
                .invalid_type("Password must be a string")
                .trim()
                .min_length(6, "Password must be at least 6 characters"),
        )
        .build()
        .expect("register schema is well-formed")
});

static LOGIN_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder(LOGIN)
        .field(
            FieldRule::string("username")
                .required("Username is required")
                .invalid_type("Username must be a string")
                .trim()
                .lowercase()
                .min_length(3, "Username must be at least 3 characters long"),
        )
        .field(
            FieldRule::string("password")
                .required("Password is required")
                .invalid_type("Password must be a string")
                .trim()
                .min_length(6, "Password must be at least 6 characters long"),
        )
        .build()
        .expect("login schema is well-formed")
});

pub fn signup_schema() -> &'static Schema {
    &SIGNUP_SCHEMA
}

pub fn register_schema() -> &'static Schema {
    &REGISTER_SCHEMA
}

pub fn login_schema() -> &'static Schema {
    &LOGIN_SCHEMA
}

/// Looks a built-in schema up by name.
pub fn schema_by_name(name: &str) -> Option<&'static Schema> {
    match name {
        SIGNUP => Some(signup_schema()),
        REGISTER => Some(register_schema()),
        LOGIN => Some(login_schema()),
        _ => None,
    }
}

/// Normalized signup/register payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupData {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Normalized login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}
