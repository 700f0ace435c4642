//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `auth` - Account payloads and the success envelope
//! - `error` - Common error response DTOs
//! - `health` - Health check responses

mod auth;
mod error;
mod health;

pub use auth::{AccountInfo, ApiResponse, AuthPayload, LoginRequest, SignupRequest};
pub use error::ErrorResponse;
pub use health::{HealthResponse, HealthStatus};
