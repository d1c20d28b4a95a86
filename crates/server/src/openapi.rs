use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::auth::AuthResponse;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Body of `POST /api/auth/signup` and `POST /api/auth/login`.
#[derive(ToSchema)]
pub struct AuthRequestDoc { pub email: String, pub password: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::signup,
        crate::routes::auth::login,
    ),
    components(
        schemas(
            HealthResponse,
            AuthRequestDoc,
            AuthResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth", description = "signup and login; any failure is a bare 400")
    )
)]
pub struct ApiDoc;
