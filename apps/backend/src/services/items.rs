//! Item CRUD over the items repo.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::entities::items as items_entity;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::query::{self, IntoSearchQuery, Pagination};
use crate::repos::items::{self, Item, ItemCreate, ItemUpdate};

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, Serialize)]
pub struct ItemsPage {
    pub data: Vec<Item>,
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

fn check_title(title: &str) -> Result<(), AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("Title must be between 1 and {MAX_TITLE_LEN} characters"),
        ));
    }
    Ok(())
}

pub async fn create_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    owner_id: Uuid,
    data: NewItem,
) -> Result<Item, AppError> {
    check_title(&data.title)?;
    let item = items::create_item(
        conn,
        ItemCreate {
            title: data.title.trim().to_string(),
            description: data.description,
            user_id: owner_id,
        },
    )
    .await?;
    info!(item_id = %item.id, user_id = %owner_id, "Item created");
    Ok(item)
}

pub async fn get_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<Item, AppError> {
    items::find_item(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::ItemNotFound, "Item not found"))
}

pub async fn list_items<C, Q>(conn: &C, page: Pagination, search: Q) -> Result<ItemsPage, AppError>
where
    C: ConnectionTrait + Send + Sync,
    Q: IntoSearchQuery,
{
    let predicates = query::build::<items_entity::Entity>(&search.into_search_query());
    let (data, count) = items::list_items(
        conn,
        query::and_all(predicates),
        page.skip,
        page.effective_limit(),
    )
    .await?;
    Ok(ItemsPage { data, count })
}

pub async fn update_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
    changes: ItemChanges,
) -> Result<Item, AppError> {
    if let Some(title) = &changes.title {
        check_title(title)?;
    }
    let update = ItemUpdate {
        title: changes.title.map(|t| t.trim().to_string()),
        description: changes.description,
    };
    items::update_item(conn, id, update)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::ItemNotFound, "Item to be updated not found"))
}

pub async fn delete_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
) -> Result<(), AppError> {
    if !items::delete_item(conn, id).await? {
        return Err(AppError::not_found(
            ErrorCode::ItemNotFound,
            "Item to be deleted not found",
        ));
    }
    info!(item_id = %id, "Item deleted");
    Ok(())
}
