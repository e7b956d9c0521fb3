use super::env::{must_var, opt_var};
use crate::error::AppError;

/// Bootstrap account created at startup when `SUPERUSER_EMAIL` is set.
#[derive(Clone)]
pub struct SuperuserConfig {
    pub email: String,
    pub password: String,
}

impl SuperuserConfig {
    /// `None` when `SUPERUSER_EMAIL` is unset; the password is then required.
    pub fn from_env() -> Result<Option<Self>, AppError> {
        let Some(email) = opt_var("SUPERUSER_EMAIL") else {
            return Ok(None);
        };
        Ok(Some(Self {
            email,
            password: must_var("SUPERUSER_PASSWORD")?,
        }))
    }
}

impl std::fmt::Debug for SuperuserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuperuserConfig")
            .field("email", &crate::logging::pii::Redacted(&self.email))
            .finish_non_exhaustive()
    }
}
