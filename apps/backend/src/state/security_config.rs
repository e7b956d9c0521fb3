use std::str::FromStr;

use jsonwebtoken::Algorithm;
use time::Duration;

use crate::config::env::{must_var, opt_var, parse_var};
use crate::error::AppError;

/// Signing key and token lifetimes.
#[derive(Clone)]
pub struct SecurityConfig {
    /// HMAC secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Signing algorithm (HS256 unless `JWT_ALGORITHM` says otherwise)
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub otp_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(24),
            otp_ttl: Duration::minutes(10),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let secret = must_var("JWT_SECRET")?;
        if secret.is_empty() {
            return Err(AppError::config("JWT_SECRET must not be empty"));
        }

        let algorithm = match opt_var("JWT_ALGORITHM") {
            Some(raw) => parse_hmac_algorithm(&raw)?,
            None => Algorithm::HS256,
        };

        Ok(Self {
            jwt_secret: secret.into_bytes(),
            algorithm,
            access_ttl: Duration::minutes(parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", 15)?),
            refresh_ttl: Duration::hours(parse_var("REFRESH_TOKEN_EXPIRE_HOURS", 24)?),
            otp_ttl: Duration::minutes(parse_var("OTP_EXPIRE_MINUTES", 10)?),
        })
    }

    /// Random per-process secret for tests.
    pub fn for_tests() -> Self {
        let secret: [u8; 32] = rand::random();
        Self::new(secret.to_vec())
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

/// Only shared-secret algorithms make sense with a single `JWT_SECRET`.
fn parse_hmac_algorithm(raw: &str) -> Result<Algorithm, AppError> {
    let algorithm = Algorithm::from_str(raw.trim())
        .map_err(|_| AppError::config(format!("Unknown JWT_ALGORITHM '{raw}'")))?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(AppError::config(format!(
            "JWT_ALGORITHM {other:?} needs a key pair; only HS256/HS384/HS512 are supported"
        ))),
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("otp_ttl", &self.otp_ttl)
            .finish_non_exhaustive()
    }
}
