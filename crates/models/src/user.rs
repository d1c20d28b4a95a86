use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user_credentials;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: DateTimeWithTimeZone,
    pub last_login: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Credentials,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Credentials => Entity::has_one(user_credentials::Entity).into(),
        }
    }
}

impl Related<user_credentials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credentials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.is_empty() || email.len() > 255 {
        return Err(ModelError::Validation("email must be 1..=255 chars".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

/// Insert a fresh account: unverified, not admin, never logged in.
pub async fn create<C: ConnectionTrait>(db: &C, email: &str) -> Result<Model, ModelError> {
    validate_email(email)?;
    let am = ActiveModel {
        email: Set(email.trim().to_string()),
        is_verified: Set(false),
        is_admin: Set(false),
        created_at: Set(Utc::now().into()),
        last_login: Set(None),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email.trim()))
        .one(db)
        .await?)
}

pub async fn record_login<C: ConnectionTrait>(
    db: &C,
    id: i64,
    at: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("user {id}")))?
        .into();
    found.last_login = Set(Some(at));
    Ok(found.update(db).await?)
}

pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<(), ModelError> {
    Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}
