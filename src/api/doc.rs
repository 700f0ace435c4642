use utoipa::OpenApi;

pub const AUTH_TAG: &str = "Auth";
pub const HEALTH_TAG: &str = "Health";
pub const SCHEMA_TAG: &str = "Schemas";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "account-rs",
        description = "Account signup, registration and login",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::validation::FieldError,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Account creation and login endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = SCHEMA_TAG, description = "Validation schema introspection"),
    )
)]
pub struct ApiDoc;
