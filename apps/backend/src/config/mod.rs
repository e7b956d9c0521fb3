//! Environment-driven configuration. Each concern reads its own variables.

pub mod db;
pub mod env;
pub mod mail;
pub mod oauth;
pub mod storage;
pub mod superuser;

pub use db::DbConfig;
pub use env::Environment;
pub use mail::SmtpConfig;
pub use oauth::GoogleOAuthConfig;
pub use storage::{LocalStorageConfig, S3Config};
pub use superuser::SuperuserConfig;
