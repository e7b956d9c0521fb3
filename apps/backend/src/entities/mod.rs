pub mod items;
pub mod users;

pub use items::Entity as Items;
pub use items::Model as Item;
pub use users::Entity as Users;
pub use users::Model as User;
pub use users::UserRole;
