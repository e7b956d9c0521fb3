//! Item repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::{Condition, ConnectionTrait};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::adapters::items_sea as items_adapter;
use crate::entities::items;
use crate::errors::domain::DomainError;

pub use items_adapter::{ItemCreate, ItemUpdate};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub async fn find_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<Option<Item>, DomainError> {
    let item = items_adapter::find_by_id(conn, id).await?;
    Ok(item.map(Item::from))
}

pub async fn create_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ItemCreate,
) -> Result<Item, DomainError> {
    let item = items_adapter::create_item(conn, dto).await?;
    Ok(Item::from(item))
}

pub async fn update_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
    dto: ItemUpdate,
) -> Result<Option<Item>, DomainError> {
    let item = items_adapter::update_item(conn, id, dto).await?;
    Ok(item.map(Item::from))
}

pub async fn list_items<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    filter: Condition,
    skip: u64,
    limit: u64,
) -> Result<(Vec<Item>, u64), DomainError> {
    let (rows, total) = items_adapter::list_items(conn, filter, skip, limit).await?;
    Ok((rows.into_iter().map(Item::from).collect(), total))
}

pub async fn delete_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<bool, DomainError> {
    Ok(items_adapter::delete_item(conn, id).await?)
}

impl From<items::Model> for Item {
    fn from(model: items::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
