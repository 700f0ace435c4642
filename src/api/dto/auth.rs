//! Account-related Data Transfer Objects

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Account;
use crate::services::AuthSession;

/// Signup / register request body.
///
/// Documentation only: handlers accept any JSON value and run it through the
/// flow's validation schema, so these bounds are enforced there.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct SignupRequest {
    #[schema(example = "Alice", min_length = 3, max_length = 30)]
    pub first_name: String,
    #[schema(example = "Smith", min_length = 3, max_length = 30)]
    pub last_name: String,
    #[schema(example = "alices", min_length = 3)]
    pub username: String,
    #[schema(example = "alice@example.com", format = "email")]
    pub email: String,
    #[schema(example = "secret1", format = "password", min_length = 6)]
    pub password: String,
}

/// Login request body.
#[derive(Debug, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alices", min_length = 3)]
    pub username: String,
    #[schema(example = "secret1", format = "password", min_length = 6)]
    pub password: String,
}

/// Success envelope: a human-readable message plus the payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = "Login Successful")]
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data,
        }
    }
}

/// Account information in responses. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "alice")]
    pub first_name: String,
    #[schema(example = "smith")]
    pub last_name: String,
    #[schema(example = "alices")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(value_type = String, format = DateTime, example = "2025-01-01T12:00:00Z")]
    pub created_at: jiff::Timestamp,
}

impl From<Account> for AccountInfo {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            username: account.username,
            email: account.email,
            created_at: account.created_at,
        }
    }
}

/// Account plus its access token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPayload {
    pub user: AccountInfo,
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub token: String,
}

impl From<AuthSession> for AuthPayload {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.account.into(),
            token: session.token,
        }
    }
}
