use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthRequest, User};
use super::errors::AuthError;
use super::store::{AuthStore, AuthTransaction};

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub password_algorithm: String,
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { password_algorithm: "argon2".into(), min_password_len: 8 }
    }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self {
        Self { password_algorithm: c.password_algorithm.clone(), min_password_len: c.min_password_len }
    }
}

/// Signup/login capability consumed by the HTTP layer.
///
/// `signup` runs inside a scope the caller opened with `begin`; the caller
/// decides whether to commit. `login` manages its own consistency.
#[async_trait]
pub trait AuthService: Send + Sync + 'static {
    type Tx: AuthTransaction + 'static;

    async fn begin(&self) -> Result<Self::Tx, AuthError>;
    async fn signup(&self, tx: &Self::Tx, input: AuthRequest) -> Result<User, AuthError>;
    async fn login(&self, input: AuthRequest) -> Result<User, AuthError>;
}

/// Account business service independent of web framework
pub struct AccountService<S: AuthStore> {
    store: Arc<S>,
    cfg: AuthConfig,
}

impl<S: AuthStore> AccountService<S> {
    /// # Examples
    /// ```
    /// use service::auth::{AccountService, AuthConfig, AuthRequest, AuthService, AuthStore, AuthTransaction};
    /// use service::auth::store::mock::MockAuthStore;
    /// use std::sync::Arc;
    /// let svc = AccountService::new(Arc::new(MockAuthStore::default()), AuthConfig::default());
    /// let user = tokio_test::block_on(async {
    ///     let tx = svc.begin().await?;
    ///     let user = svc.signup(&tx, AuthRequest { email: "user@example.com".into(), password: "Secret123".into() }).await?;
    ///     tx.commit().await?;
    ///     Ok::<_, service::auth::AuthError>(user)
    /// }).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert!(!user.is_verified);
    /// ```
    pub fn new(store: Arc<S>, cfg: AuthConfig) -> Self { Self { store, cfg } }

    pub fn store(&self) -> &S { &self.store }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }
}

#[async_trait]
impl<S: AuthStore> AuthService for AccountService<S> {
    type Tx = S::Tx;

    async fn begin(&self) -> Result<Self::Tx, AuthError> {
        self.store.begin().await
    }

    /// Create an account with a hashed password.
    #[instrument(skip(self, tx, input), fields(email = %input.email))]
    async fn signup(&self, tx: &Self::Tx, input: AuthRequest) -> Result<User, AuthError> {
        models::user::validate_email(&input.email)?;
        if input.password.chars().count() < self.cfg.min_password_len {
            return Err(AuthError::Validation(format!("password too short (>={})", self.cfg.min_password_len)));
        }

        let repo = tx.repository();
        if let Some(existing) = repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = repo.create_user(&input.email).await?;
        let hash = self.hash_password(&input.password)?;
        repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = user.id, email = %user.email, "user_signed_up");
        Ok(user)
    }

    /// Verify credentials and stamp `last_login`.
    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn login(&self, input: AuthRequest) -> Result<User, AuthError> {
        let repo = self.store.repository();
        let user = repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let user = repo.record_login(user.id, Utc::now()).await?;
        info!(user_id = user.id, "user_logged_in");
        Ok(user)
    }
}
