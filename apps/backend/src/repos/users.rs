//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::{Condition, ConnectionTrait};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::adapters::users_sea as users_adapter;
use crate::entities::users::{self, UserRole};
use crate::errors::domain::DomainError;

pub use users_adapter::{UserCreate, UserUpdate};

/// User domain model. The password hash never leaves the repo layer
/// except through [`find_credentials_by_email`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn is_superuser(&self) -> bool {
        self.role == UserRole::Superuser
    }
}

/// A user together with the stored password hash, for credential checks.
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_id(conn, id).await?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_email(conn, email).await?;
    Ok(user.map(User::from))
}

pub async fn find_credentials_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<UserCredentials>, DomainError> {
    let user = users_adapter::find_by_email(conn, email).await?;
    Ok(user.map(UserCredentials::from))
}

pub async fn find_credentials_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<Option<UserCredentials>, DomainError> {
    let user = users_adapter::find_by_id(conn, id).await?;
    Ok(user.map(UserCredentials::from))
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
    dto: UserUpdate,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::update_user(conn, id, dto).await?;
    Ok(user.map(User::from))
}

/// One page of users matching `filter` and the total match count.
pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: Condition,
    skip: u64,
    limit: u64,
) -> Result<(Vec<User>, u64), DomainError> {
    let (rows, total) = users_adapter::list_users(conn, filter, skip, limit).await?;
    Ok((rows.into_iter().map(User::from).collect(), total))
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<bool, DomainError> {
    Ok(users_adapter::delete_user(conn, id).await?)
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role: model.role,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<users::Model> for UserCredentials {
    fn from(mut model: users::Model) -> Self {
        let password_hash = std::mem::take(&mut model.password);
        Self {
            user: User::from(model),
            password_hash,
        }
    }
}
