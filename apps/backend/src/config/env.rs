use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Deployment environment, read from `ENVIRONMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("ENVIRONMENT") {
            Ok(raw) => raw.parse(),
            Err(_) => Ok(Self::Development),
        }
    }

    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DEVELOPMENT" => Ok(Self::Development),
            "TESTING" => Ok(Self::Testing),
            "PRODUCTION" => Ok(Self::Production),
            other => Err(AppError::config(format!(
                "ENVIRONMENT must be DEVELOPMENT, TESTING or PRODUCTION, got '{other}'"
            ))),
        }
    }
}

/// Required environment variable or a config error naming it.
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

pub(crate) fn opt_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parses `name` when set, otherwise returns `default`.
pub(crate) fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match opt_var(name) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::config(format!("Environment variable '{name}' has an invalid value"))
        }),
        None => Ok(default),
    }
}
