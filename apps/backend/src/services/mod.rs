//! Business operations. Services take a connection, call repos and return `AppError`.

pub mod auth;
pub mod files;
pub mod items;
pub mod users;
