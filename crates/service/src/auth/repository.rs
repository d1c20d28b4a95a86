use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{Credentials, User};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    async fn create_user(&self, email: &str) -> Result<User, AuthError>;

    async fn get_credentials(&self, user_id: i64) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: i64, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;

    /// Stamp `last_login` and return the updated user.
    async fn record_login(&self, user_id: i64, at: DateTime<Utc>) -> Result<User, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Clone, Default)]
    struct MockState {
        users: HashMap<String, User>,       // key: email
        creds: HashMap<i64, Credentials>,   // key: user_id
        next_id: i64,
        fail_credential_writes: bool,
    }

    #[derive(Default)]
    pub struct MockAuthRepository {
        state: Mutex<MockState>,
    }

    impl MockAuthRepository {
        /// A repository whose `upsert_password` always fails, leaving a
        /// half-finished signup behind unless the caller rolls back.
        pub fn failing_credential_writes() -> Self {
            let repo = Self::default();
            if let Ok(mut s) = repo.state.lock() {
                s.fail_credential_writes = true;
            }
            repo
        }

        fn lock(&self) -> Result<MutexGuard<'_, MockState>, AuthError> {
            self.state
                .lock()
                .map_err(|_| AuthError::Repository("mock state poisoned".into()))
        }

        /// Independent copy of the current contents.
        pub fn snapshot(&self) -> Result<MockAuthRepository, AuthError> {
            let state = self.lock()?.clone();
            Ok(MockAuthRepository { state: Mutex::new(state) })
        }

        /// Replace the contents with those of `other`.
        pub fn replace_with(&self, other: &MockAuthRepository) -> Result<(), AuthError> {
            let incoming = other.lock()?.clone();
            *self.lock()? = incoming;
            Ok(())
        }

        pub fn user_count(&self) -> usize {
            self.lock().map(|s| s.users.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
            let state = self.lock()?;
            Ok(state.users.get(email.trim()).cloned())
        }

        async fn create_user(&self, email: &str) -> Result<User, AuthError> {
            let mut state = self.lock()?;
            let email = email.trim().to_string();
            if state.users.contains_key(&email) {
                return Err(AuthError::Repository(format!("unique violation on email {email}")));
            }
            state.next_id += 1;
            let user = User {
                id: state.next_id,
                email: email.clone(),
                is_verified: false,
                is_admin: false,
                created_at: Utc::now(),
                last_login: None,
            };
            state.users.insert(email, user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: i64) -> Result<Option<Credentials>, AuthError> {
            let state = self.lock()?;
            Ok(state.creds.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: i64, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let mut state = self.lock()?;
            if state.fail_credential_writes {
                return Err(AuthError::Repository("credential write failed".into()));
            }
            let c = Credentials { user_id, password_hash, password_algorithm };
            state.creds.insert(user_id, c.clone());
            Ok(c)
        }

        async fn record_login(&self, user_id: i64, at: DateTime<Utc>) -> Result<User, AuthError> {
            let mut state = self.lock()?;
            let user = state
                .users
                .values_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| AuthError::Repository(format!("user {user_id} not found")))?;
            user.last_login = Some(at);
            Ok(user.clone())
        }
    }
}
