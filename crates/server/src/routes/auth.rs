use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use service::auth::{AuthError, AuthRequest, AuthService, AuthTransaction, User};

use crate::errors::BadRequest;

/// Public view of a user returned by signup and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: i64,
    pub email: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for AuthResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_verified: user.is_verified,
            is_admin: user.is_admin,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// Signup/login endpoints over an [`AuthService`].
pub struct AuthEndpoint<A> {
    service: Arc<A>,
}

impl<A> Clone for AuthEndpoint<A> {
    fn clone(&self) -> Self {
        Self { service: Arc::clone(&self.service) }
    }
}

impl<A: AuthService> AuthEndpoint<A> {
    pub fn new(service: Arc<A>) -> Self {
        Self { service }
    }

    /// Runs the collaborator's signup inside its own transaction scope.
    /// Commits only on success; every error path rolls back.
    pub async fn signup(&self, input: AuthRequest) -> Result<AuthResponse, AuthError> {
        let tx = self.service.begin().await?;
        match self.service.signup(&tx, input).await {
            Ok(user) => {
                tx.commit().await?;
                Ok(user.into())
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(err = %rb, "rollback after failed signup also failed");
                }
                Err(e)
            }
        }
    }

    /// No transaction scope here; the collaborator owns login consistency.
    pub async fn login(&self, input: AuthRequest) -> Result<AuthResponse, AuthError> {
        let user = self.service.login(input).await?;
        Ok(user.into())
    }

    /// `POST /api/auth/signup` and `POST /api/auth/login`.
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/auth/signup", post(signup::<A>))
            .route("/api/auth/login", post(login::<A>))
            .with_state(self)
    }
}

fn read_body(op: &str, body: Result<Json<AuthRequest>, JsonRejection>) -> Result<AuthRequest, BadRequest> {
    match body {
        Ok(Json(input)) => Ok(input),
        Err(rejection) => {
            // Same bare 400 as a service failure; axum's rejection text stays in the log
            warn!(op, err = %rejection.body_text(), "rejected request body");
            Err(BadRequest)
        }
    }
}

#[utoipa::path(post, path = "/api/auth/signup", tag = "auth", request_body = crate::openapi::AuthRequestDoc, responses((status = 200, description = "Account created", body = AuthResponse), (status = 400, description = "Any failure; empty body")))]
pub async fn signup<A: AuthService>(
    State(endpoint): State<AuthEndpoint<A>>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, BadRequest> {
    let input = read_body("signup", body)?;
    match endpoint.signup(input).await {
        Ok(out) => Ok(Json(out)),
        // Scope already rolled back; only the message is logged
        Err(e) => {
            error!(err = %e, "error during signup");
            Err(BadRequest)
        }
    }
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::AuthRequestDoc, responses((status = 200, description = "Logged in; lastLogin updated", body = AuthResponse), (status = 400, description = "Any failure; empty body")))]
pub async fn login<A: AuthService>(
    State(endpoint): State<AuthEndpoint<A>>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, BadRequest> {
    let input = read_body("login", body)?;
    match endpoint.login(input).await {
        Ok(out) => Ok(Json(out)),
        // Unknown email and wrong password look the same to the caller
        Err(e) => {
            error!(err = %e, "error during login");
            Err(BadRequest)
        }
    }
}
