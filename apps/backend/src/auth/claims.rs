//! Token payload and its signed wire shape.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::entities::users::UserRole;

/// What a verified token tells the caller: who, and with which role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Opaque subject identifier (the user's UUID in this backend)
    pub sub: String,
    pub role: UserRole,
}

impl TokenPayload {
    pub fn new(sub: impl Into<String>, role: UserRole) -> Self {
        Self {
            sub: sub.into(),
            role,
        }
    }

    pub fn for_user(id: Uuid, role: UserRole) -> Self {
        Self::new(id.to_string(), role)
    }

    /// Subject parsed as a user id, when it is one.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    pub fn is_superuser(&self) -> bool {
        self.role == UserRole::Superuser
    }
}

/// Signed claims: `{sub, role, exp}` with `exp` in unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub exp: i64,
}
