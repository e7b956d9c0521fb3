//! DTOs for items_sea adapter.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ItemCreate {
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}
