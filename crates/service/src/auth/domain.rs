use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signup and login body: an email plus a plaintext password.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Domain user (business view). Holds no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: i64,
    pub password_hash: String,
    pub password_algorithm: String,
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            is_verified: m.is_verified,
            is_admin: m.is_admin,
            created_at: m.created_at.with_timezone(&Utc),
            last_login: m.last_login.map(|t| t.with_timezone(&Utc)),
        }
    }
}

impl From<models::user_credentials::Model> for Credentials {
    fn from(c: models::user_credentials::Model) -> Self {
        Self { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }
    }
}
