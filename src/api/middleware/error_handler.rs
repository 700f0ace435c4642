//! Error handler for converting AppError to HTTP responses.
//!
//! This module implements the IntoResponse trait for AppError,
//! providing consistent error response formatting across the API.
//! Server-side failures are logged here with their full source chain and
//! reported to the client with a sanitized message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::{AppError, FailureStatus};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_to_response_with_request_id(self, None)
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
///
/// # Status Code Mapping
/// - ValidationFailed → 400 (signup) / 422 (register, login)
/// - Duplicate → 409 CONFLICT
/// - AccountExists, AccountNotFound → 400 BAD_REQUEST
/// - NotFound → 404 NOT_FOUND
/// - Validation → 400 BAD_REQUEST
/// - Unauthorized → 401 UNAUTHORIZED
/// - Database, Configuration, Internal → 500 INTERNAL_SERVER_ERROR
/// - ConnectionPool → 503 SERVICE_UNAVAILABLE
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::ValidationFailed { status, .. } => match status {
            FailureStatus::BadRequest => StatusCode::BAD_REQUEST,
            FailureStatus::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        },
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::AccountExists { .. } => StatusCode::BAD_REQUEST,
        AppError::AccountNotFound { .. } => StatusCode::BAD_REQUEST,
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::ValidationFailed { .. } => "VALIDATION_FAILED",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::AccountExists { .. } => "ACCOUNT_EXISTS",
        AppError::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn error_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);
    match error {
        AppError::ValidationFailed {
            message, errors, ..
        } => ErrorResponse::new(code, message).with_errors(errors.clone()),
        AppError::Duplicate { entity, field, .. } => {
            ErrorResponse::new(code, &duplicate_message(field)).with_details(json!({
                "entity": entity,
                "field": field,
            }))
        }
        AppError::AccountExists { field, .. } => {
            ErrorResponse::new(code, "User already exists. Login Instead.")
                .with_details(json!({ "field": field }))
        }
        AppError::AccountNotFound { field, .. } => {
            ErrorResponse::new(code, "User does not exist. Register account instead.")
                .with_details(json!({ "field": field }))
        }
        AppError::NotFound {
            entity,
            field,
            value,
        } => ErrorResponse::new(code, &format!("{} not found", entity)).with_details(json!({
            "field": field,
            "value": value,
        })),
        AppError::Validation { field, reason } => ErrorResponse::new(code, reason)
            .with_details(json!({ "field": field })),
        AppError::Unauthorized { message } => ErrorResponse::new(code, message),
        AppError::Database { operation, .. } => ErrorResponse::new(
            code,
            &format!("Database operation failed: {}", operation),
        ),
        AppError::Configuration { key, .. } => {
            ErrorResponse::new(code, &format!("Configuration error: {}", key))
        }
        AppError::ConnectionPool { .. } => {
            ErrorResponse::new(code, "Database connection unavailable")
        }
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

/// `"Username already exists. Try another username."`
fn duplicate_message(field: &str) -> String {
    let mut chars = field.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{} already exists. Try another {}.", capitalized, field)
}

/// Creates an HTTP response from an AppError, tagging it with the request ID
/// when one is known.
pub fn error_to_response_with_request_id(error: AppError, request_id: Option<String>) -> Response {
    let status = error_to_status_code(&error);

    if status.is_server_error() {
        tracing::error!(
            error = %error,
            source = ?error,
            request_id = request_id.as_deref().unwrap_or("unknown"),
            "Request failed with server error"
        );
    }

    let mut body = error_body(&error);
    if let Some(id) = request_id {
        body = body.with_request_id(&id);
    }

    (status, Json(body)).into_response()
}

/// Converts axum JSON rejection errors to ErrorResponse.
pub fn handle_json_rejection(rejection: JsonRejection, request_id: Option<String>) -> Response {
    let (status, mut body) = match rejection {
        JsonRejection::JsonDataError(err) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_JSON", "Invalid JSON format")
                .with_details(json!({ "error": err.body_text() })),
        ),
        JsonRejection::JsonSyntaxError(err) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JSON_SYNTAX_ERROR", "JSON syntax error")
                .with_details(json!({ "error": err.body_text() })),
        ),
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorResponse::new(
                "MISSING_CONTENT_TYPE",
                "Missing or invalid Content-Type header",
            )
            .with_details(json!({ "expected": "application/json" })),
        ),
        JsonRejection::BytesRejection(_) => (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorResponse::new("REQUEST_TOO_LARGE", "Request body too large"),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JSON_ERROR", "Failed to parse JSON request"),
        ),
    };

    if let Some(id) = request_id {
        body = body.with_request_id(&id);
    }

    (status, Json(body)).into_response()
}

/// Converts axum path rejection errors to ErrorResponse.
pub fn handle_path_rejection(rejection: PathRejection) -> Response {
    let body = ErrorResponse::new("INVALID_PATH_PARAMS", "Invalid path parameters")
        .with_details(json!({ "error": rejection.body_text() }));
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Rewrites non-JSON error responses (unknown routes, wrong methods, timeouts)
/// into the standard ErrorResponse format.
pub async fn global_error_handler(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (code, message) = match status {
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => (
            "METHOD_NOT_ALLOWED",
            "HTTP method not allowed for this endpoint",
        ),
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        s if s.is_server_error() => ("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        _ => ("BAD_REQUEST", "Bad request - invalid or malformed request"),
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    (parts, Json(ErrorResponse::new(code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;
    use axum::body::{Body, to_bytes};
    use axum::extract::rejection::MissingJsonContentType;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_failed_uses_flow_status() {
        let errors = vec![FieldError::new("firstName", "Must be at least 3 Characters long")];

        let signup = AppError::ValidationFailed {
            status: FailureStatus::BadRequest,
            message: "Validation Failed, Try again!".to_string(),
            errors: errors.clone(),
        };
        assert_eq!(error_to_status_code(&signup), StatusCode::BAD_REQUEST);

        let login = AppError::ValidationFailed {
            status: FailureStatus::Unprocessable,
            message: "Validation Failed, Try again!".to_string(),
            errors,
        };
        let response = login.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["message"], "Validation Failed, Try again!");
        assert_eq!(body["errors"][0]["field"], "firstName");
    }

    #[tokio::test]
    async fn test_duplicate_names_field() {
        let error = AppError::Duplicate {
            entity: "accounts".to_string(),
            field: "username".to_string(),
            value: "alices".to_string(),
        };
        assert_eq!(error_to_code(&error), "DUPLICATE_ENTRY");

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "Username already exists. Try another username."
        );
        assert_eq!(body["details"]["field"], "username");
    }

    #[tokio::test]
    async fn test_account_exists_and_not_found_are_bad_request() {
        let exists = AppError::AccountExists {
            field: "email".to_string(),
            value: "a@b.co".to_string(),
        };
        let response = exists.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "User already exists. Login Instead."
        );

        let missing = AppError::AccountNotFound {
            field: "username".to_string(),
            value: "bob".to_string(),
        };
        let response = missing.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "User does not exist. Register account instead."
        );
    }

    #[test]
    fn test_unauthorized_status_code() {
        let error = AppError::Unauthorized {
            message: "Invalid username or password".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::UNAUTHORIZED);
        assert_eq!(error_to_code(&error), "UNAUTHORIZED");
    }

    #[test]
    fn test_server_error_status_codes() {
        let pool = AppError::ConnectionPool {
            source: anyhow::anyhow!("Pool exhausted"),
        };
        assert_eq!(error_to_status_code(&pool), StatusCode::SERVICE_UNAVAILABLE);

        let database = AppError::Database {
            operation: "insert account".to_string(),
            source: anyhow::anyhow!("Connection failed"),
        };
        assert_eq!(
            error_to_status_code(&database),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_error_is_sanitized() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("stack trace with sensitive data"),
        };

        let response = error_to_response_with_request_id(error, Some("req-456".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
        assert_eq!(body["request_id"], "req-456");
        assert!(!body.to_string().contains("sensitive"));
    }

    #[tokio::test]
    async fn test_handle_json_rejection_missing_content_type() {
        let rejection = JsonRejection::MissingJsonContentType(MissingJsonContentType::default());
        let response = handle_json_rejection(rejection, None);
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["code"], "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_global_error_handler_rewrites_plain_404() {
        use axum::{Router, middleware, routing::get};
        use tower::ServiceExt;

        let app = Router::new()
            .route("/known", get(|| async { "ok" }))
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[test]
    fn test_duplicate_message_capitalizes_field() {
        assert_eq!(
            duplicate_message("email"),
            "Email already exists. Try another email."
        );
    }
}
