//! Account handlers: signup, register and login.
//!
//! Bodies are taken as raw JSON and handed to the account service, which
//! runs them through the flow's validation schema before anything else.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{ApiResponse, AuthPayload, ErrorResponse, LoginRequest, SignupRequest};
use crate::api::middleware::{
    RequestId, error_to_response_with_request_id, handle_json_rejection,
};
use crate::error::AppResult;
use crate::services::AuthSession;
use crate::state::AppState;

const ACCOUNT_CREATED_MESSAGE: &str = "Successfully created an account";
const LOGIN_SUCCESS_MESSAGE: &str = "Login Successful";

/// Creates the authentication routes
///
/// # Routes
/// - `POST /signup` - Create an account (400 on invalid body)
/// - `POST /register` - Create an account (422 on invalid body)
/// - `POST /login` - Authenticate and get a token
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(signup))
        .routes(routes!(register))
        .routes(routes!(login))
}

/// POST /api/auth/signup - Create an account
#[utoipa::path(
    post,
    path = "/signup",
    tag = AUTH_TAG,
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthPayload>),
        (status = 400, description = "Validation failed or account exists", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    )
)]
async fn signup(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = request_id.map(|Extension(id)| id.0);
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return handle_json_rejection(rejection, request_id),
    };

    respond(
        state.services.accounts.signup(&body).await,
        StatusCode::CREATED,
        ACCOUNT_CREATED_MESSAGE,
        request_id,
    )
}

/// POST /api/auth/register - Register an account
#[utoipa::path(
    post,
    path = "/register",
    tag = AUTH_TAG,
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthPayload>),
        (status = 400, description = "Account already exists", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
async fn register(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = request_id.map(|Extension(id)| id.0);
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return handle_json_rejection(rejection, request_id),
    };

    respond(
        state.services.accounts.register(&body).await,
        StatusCode::CREATED,
        ACCOUNT_CREATED_MESSAGE,
        request_id,
    )
}

/// POST /api/auth/login - Authenticate by username and password
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthPayload>),
        (status = 400, description = "Account does not exist", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = request_id.map(|Extension(id)| id.0);
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return handle_json_rejection(rejection, request_id),
    };

    respond(
        state.services.accounts.login(&body).await,
        StatusCode::OK,
        LOGIN_SUCCESS_MESSAGE,
        request_id,
    )
}

fn respond(
    result: AppResult<AuthSession>,
    status: StatusCode,
    message: &str,
    request_id: Option<String>,
) -> Response {
    match result {
        Ok(session) => (
            status,
            Json(ApiResponse::new(message, AuthPayload::from(session))),
        )
            .into_response(),
        Err(error) => error_to_response_with_request_id(error, request_id),
    }
}
