//! SeaORM adapter for the items table.

use sea_orm::{
    ActiveModelTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::items;

pub mod dto;

pub use dto::{ItemCreate, ItemUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<Option<items::Model>, sea_orm::DbErr> {
    items::Entity::find_by_id(id).one(conn).await
}

pub async fn create_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ItemCreate,
) -> Result<items::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    items::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(dto.title),
        description: Set(dto.description),
        user_id: Set(dto.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// `Ok(None)` when no row has this id.
pub async fn update_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
    dto: ItemUpdate,
) -> Result<Option<items::Model>, sea_orm::DbErr> {
    let Some(model) = find_by_id(conn, id).await? else {
        return Ok(None);
    };
    if dto.is_empty() {
        return Ok(Some(model));
    }

    let mut active: items::ActiveModel = model.into();
    if let Some(title) = dto.title {
        active.title = Set(title);
    }
    if let Some(description) = dto.description {
        active.description = Set(Some(description));
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    active.update(conn).await.map(Some)
}

pub async fn list_items<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: Condition,
    skip: u64,
    limit: u64,
) -> Result<(Vec<items::Model>, u64), sea_orm::DbErr> {
    let total = items::Entity::find()
        .filter(filter.clone())
        .count(conn)
        .await?;
    let rows = items::Entity::find()
        .filter(filter)
        .order_by_asc(items::Column::CreatedAt)
        .order_by_asc(items::Column::Id)
        .offset(skip)
        .limit(limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn delete_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<bool, sea_orm::DbErr> {
    let res = items::Entity::delete_by_id(id).exec(conn).await?;
    Ok(res.rows_affected > 0)
}
