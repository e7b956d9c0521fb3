//! Query-string search DTOs. Every field is optional; unset fields produce
//! no filter.

use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use super::filter::{FilterValue, SearchQuery};
use crate::entities::users::UserRole;

pub trait IntoSearchQuery {
    fn into_search_query(self) -> SearchQuery;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearch {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: Option<Date>,
    pub updated_at: Option<Date>,
}

impl IntoSearchQuery for ItemSearch {
    fn into_search_query(self) -> SearchQuery {
        SearchQuery::new()
            .with_opt("id", self.id)
            .with_opt("title", self.title)
            .with_opt("description", self.description)
            .with_opt("user_id", self.user_id)
            .with_opt("created_at", self.created_at)
            .with_opt("updated_at", self.updated_at)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearch {
    pub id: Option<Uuid>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub created_at: Option<Date>,
    pub updated_at: Option<Date>,
}

impl IntoSearchQuery for UserSearch {
    fn into_search_query(self) -> SearchQuery {
        SearchQuery::new()
            .with_opt("id", self.id)
            .with_opt("email", self.email)
            .with_opt("full_name", self.full_name)
            .with_opt(
                "role",
                self.role.map(|r| FilterValue::Enum(r.as_str().to_string())),
            )
            .with_opt("is_active", self.is_active)
            .with_opt("created_at", self.created_at)
            .with_opt("updated_at", self.updated_at)
    }
}

impl IntoSearchQuery for SearchQuery {
    fn into_search_query(self) -> SearchQuery {
        self
    }
}

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// `skip`/`limit` paging; `limit` is clamped to `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    pub fn effective_limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn item_search_deserialises_camel_case_and_skips_unset() {
        let search: ItemSearch =
            serde_json::from_value(serde_json::json!({ "title": "lamp", "createdAt": "2024-01-01" }))
                .unwrap();
        assert_eq!(search.created_at, Some(date!(2024 - 01 - 01)));

        let query = search.into_search_query();
        let fields: Vec<_> = query.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(fields, vec!["title", "created_at"]);
    }

    #[test]
    fn user_search_role_is_an_enum_filter() {
        let query = UserSearch {
            role: Some(UserRole::Superuser),
            ..Default::default()
        }
        .into_search_query();
        let (_, value) = query.iter().next().unwrap();
        assert_eq!(value, &FilterValue::Enum("superuser".into()));
    }

    #[test]
    fn pagination_clamps_limit() {
        assert_eq!(Pagination::new(0, 0).effective_limit(), 1);
        assert_eq!(Pagination::new(0, 5000).effective_limit(), MAX_LIMIT);
        assert_eq!(Pagination::default().effective_limit(), DEFAULT_LIMIT);
    }
}
