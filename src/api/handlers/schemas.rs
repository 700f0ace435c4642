//! Read-only introspection of the built-in validation schemas.

use axum::{
    Json,
    extract::{Path, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::SCHEMA_TAG;
use crate::api::dto::ErrorResponse;
use crate::api::middleware::handle_path_rejection;
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::schemas::schema_by_name;

pub fn schema_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get_schema))
}

/// GET /api/schemas/{name} - Field table of a built-in schema
#[utoipa::path(
    get,
    path = "/{name}",
    tag = SCHEMA_TAG,
    params(
        ("name" = String, Path, description = "Schema name: signup, register or login")
    ),
    responses(
        (status = 200, description = "Ordered field rules of the schema"),
        (status = 404, description = "Unknown schema", body = ErrorResponse)
    )
)]
async fn get_schema(name: Result<Path<String>, PathRejection>) -> Response {
    let Path(name) = match name {
        Ok(name) => name,
        Err(rejection) => return handle_path_rejection(rejection),
    };

    match schema_by_name(&name) {
        Some(schema) => Json(schema).into_response(),
        None => AppError::NotFound {
            entity: "schema".to_string(),
            field: "name".to_string(),
            value: name,
        }
        .into_response(),
    }
}
