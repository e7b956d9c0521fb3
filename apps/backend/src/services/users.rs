//! User reads and public profile updates.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::users as users_entity;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::query::{self, IntoSearchQuery, Pagination};
use crate::repos::users::{self, User, UserUpdate};

#[derive(Debug, Clone, Serialize)]
pub struct UsersPage {
    pub data: Vec<User>,
    pub count: u64,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdatePublic {
    pub full_name: Option<String>,
}

fn user_not_found() -> AppError {
    AppError::not_found(ErrorCode::UserNotFound, "User not found")
}

pub async fn get_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<User, AppError> {
    users::find_user_by_id(conn, id)
        .await?
        .ok_or_else(user_not_found)
}

/// Lists users matching `search`. The count reflects the same filters.
pub async fn list_users<C, Q>(conn: &C, page: Pagination, search: Q) -> Result<UsersPage, AppError>
where
    C: ConnectionTrait + Send + Sync,
    Q: IntoSearchQuery,
{
    let predicates = query::build::<users_entity::Entity>(&search.into_search_query());
    let (data, count) = users::list_users(
        conn,
        query::and_all(predicates),
        page.skip,
        page.effective_limit(),
    )
    .await?;
    Ok(UsersPage { data, count })
}

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
    data: UserUpdatePublic,
) -> Result<User, AppError> {
    let update = UserUpdate {
        full_name: data.full_name,
        ..UserUpdate::default()
    };
    users::update_user(conn, id, update)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User to be updated not found"))
}

