use starter_backend::auth::password::hash_password;
use starter_backend::repos::items::{self, Item, ItemCreate};
use starter_backend::repos::users::{self, User, UserCreate};
use starter_backend::UserRole;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

pub const SEED_PASSWORD: &str = "correct-horse-battery";

/// Inserts a user straight through the repo with [`SEED_PASSWORD`].
pub async fn seed_user(db: &DatabaseConnection, email: &str, role: UserRole) -> User {
    let hash = hash_password(SEED_PASSWORD).expect("hash");
    users::create_user(db, UserCreate::new(email, hash).with_role(role))
        .await
        .expect("seed user")
}

pub async fn seed_item(
    db: &DatabaseConnection,
    owner: Uuid,
    title: &str,
    description: Option<&str>,
) -> Item {
    items::create_item(
        db,
        ItemCreate {
            title: title.to_string(),
            description: description.map(str::to_string),
            user_id: owner,
        },
    )
    .await
    .expect("seed item")
}
