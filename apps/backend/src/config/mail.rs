use super::env::{must_var, opt_var, parse_var};
use crate::error::AppError;

#[derive(Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_name: Option<String>,
}

impl SmtpConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            server: must_var("SMTP_SERVER")?,
            port: parse_var("SMTP_PORT", 587)?,
            username: must_var("SMTP_USERNAME")?,
            password: must_var("SMTP_PASSWORD")?,
            from_name: opt_var("SMTP_FROM_NAME"),
        })
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("from_name", &self.from_name)
            .finish_non_exhaustive()
    }
}
