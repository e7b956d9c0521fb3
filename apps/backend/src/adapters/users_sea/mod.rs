//! SeaORM adapter for the users table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::users;

pub mod dto;

pub use dto::{UserCreate, UserUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let active = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(dto.email),
        password: Set(dto.password_hash),
        full_name: Set(dto.full_name),
        role: Set(dto.role),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await
}

/// `Ok(None)` when no row has this id.
pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
    dto: UserUpdate,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    let Some(model) = find_by_id(conn, id).await? else {
        return Ok(None);
    };

    let mut active: users::ActiveModel = model.into();
    if let Some(email) = dto.email {
        active.email = Set(email);
    }
    if let Some(full_name) = dto.full_name {
        active.full_name = Set(Some(full_name));
    }
    if let Some(hash) = dto.password_hash {
        active.password = Set(hash);
    }
    if let Some(is_active) = dto.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    active.update(conn).await.map(Some)
}

/// One page of rows matching `filter`, plus the total number of matches.
pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: Condition,
    skip: u64,
    limit: u64,
) -> Result<(Vec<users::Model>, u64), sea_orm::DbErr> {
    let total = users::Entity::find()
        .filter(filter.clone())
        .count(conn)
        .await?;
    let rows = users::Entity::find()
        .filter(filter)
        .order_by_asc(users::Column::CreatedAt)
        .order_by_asc(users::Column::Id)
        .offset(skip)
        .limit(limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<bool, sea_orm::DbErr> {
    let res = users::Entity::delete_by_id(id).exec(conn).await?;
    Ok(res.rows_affected > 0)
}
