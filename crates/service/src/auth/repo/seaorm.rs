use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::auth::domain::{Credentials, User};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::auth::store::{AuthStore, AuthTransaction};

/// Works over a plain connection or an open transaction.
pub struct SeaOrmAuthRepository<C> {
    pub db: C,
}

#[async_trait]
impl<C> AuthRepository for SeaOrmAuthRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let res = models::user::find_by_email(&self.db, email).await?;
        Ok(res.map(User::from))
    }

    async fn create_user(&self, email: &str) -> Result<User, AuthError> {
        let created = models::user::create(&self.db, email).await?;
        Ok(created.into())
    }

    async fn get_credentials(&self, user_id: i64) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(Credentials::from))
    }

    async fn upsert_password(&self, user_id: i64, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = models::user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm).await?;
        Ok(c.into())
    }

    async fn record_login(&self, user_id: i64, at: DateTime<Utc>) -> Result<User, AuthError> {
        let updated = models::user::record_login(&self.db, user_id, at.into()).await?;
        Ok(updated.into())
    }
}

pub struct SeaOrmAuthStore {
    repo: SeaOrmAuthRepository<DatabaseConnection>,
}

impl SeaOrmAuthStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { repo: SeaOrmAuthRepository { db } }
    }
}

pub struct SeaOrmAuthTransaction {
    repo: SeaOrmAuthRepository<DatabaseTransaction>,
}

#[async_trait]
impl AuthTransaction for SeaOrmAuthTransaction {
    fn repository(&self) -> &dyn AuthRepository {
        &self.repo
    }

    async fn commit(self) -> Result<(), AuthError> {
        self.repo.db.commit().await.map_err(|e| AuthError::Transaction(e.to_string()))
    }

    async fn rollback(self) -> Result<(), AuthError> {
        self.repo.db.rollback().await.map_err(|e| AuthError::Transaction(e.to_string()))
    }
}

#[async_trait]
impl AuthStore for SeaOrmAuthStore {
    type Tx = SeaOrmAuthTransaction;

    fn repository(&self) -> &dyn AuthRepository {
        &self.repo
    }

    async fn begin(&self) -> Result<Self::Tx, AuthError> {
        let txn = self.repo.db.begin().await.map_err(|e| AuthError::Transaction(e.to_string()))?;
        Ok(SeaOrmAuthTransaction { repo: SeaOrmAuthRepository { db: txn } })
    }
}
