use std::sync::Arc;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, TokenPayload, UserRole};
use crate::clock::{Clock, SystemClock};
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature or structure is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token claim '{0}' is missing or invalid")]
    Malformed(String),
    #[error("failed to encode token: {0}")]
    Encode(String),
}

/// A signed token together with the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Issues and verifies HMAC-signed bearer tokens.
///
/// Access and refresh tokens share one encoding and differ only in TTL.
#[derive(Debug, Clone)]
pub struct TokenService {
    security: SecurityConfig,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(security: SecurityConfig) -> Self {
        Self::with_clock(security, Arc::new(SystemClock))
    }

    pub fn with_clock(security: SecurityConfig, clock: Arc<dyn Clock>) -> Self {
        Self { security, clock }
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    pub(crate) fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    pub fn issue_access(&self, payload: &TokenPayload, ttl: Duration) -> Result<String, TokenError> {
        self.sign(payload, ttl).map(|issued| issued.token)
    }

    pub fn issue_refresh(
        &self,
        payload: &TokenPayload,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        self.sign(payload, ttl)
    }

    /// Access token with the configured access TTL.
    pub fn access_token(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        self.issue_access(payload, self.security.access_ttl)
    }

    /// Refresh token with the configured refresh TTL.
    pub fn refresh_token(&self, payload: &TokenPayload) -> Result<IssuedToken, TokenError> {
        self.issue_refresh(payload, self.security.refresh_ttl)
    }

    fn sign(&self, payload: &TokenPayload, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let expires_at = self.clock.now() + ttl;
        let claims = Claims {
            sub: payload.sub.clone(),
            role: payload.role,
            exp: expires_at.unix_timestamp(),
        };

        let token = encode(
            &Header::new(self.security.algorithm),
            &claims,
            &EncodingKey::from_secret(&self.security.jwt_secret),
        )
        .map_err(|e| TokenError::Encode(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies signature and expiry, then extracts the payload.
    ///
    /// Expiry is checked here against the injected clock with zero leeway
    /// (`exp <= now` is expired) rather than by `jsonwebtoken`, so every
    /// structural or signature failure maps to `InvalidSignature` and claim
    /// problems map to `Malformed`.
    pub fn decode(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let mut validation = Validation::new(self.security.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        let data = decode::<Map<String, Value>>(
            token,
            &DecodingKey::from_secret(&self.security.jwt_secret),
            &validation,
        )
        .map_err(|e| {
            debug!(kind = ?e.kind(), "Token failed verification");
            TokenError::InvalidSignature
        })?;
        let claims = data.claims;

        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or_else(|| TokenError::Malformed("exp".into()))?;
        if exp <= self.clock.now().unix_timestamp() {
            return Err(TokenError::Expired);
        }

        let sub = claims
            .get("sub")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TokenError::Malformed("sub".into()))?;
        let role = claims
            .get("role")
            .and_then(Value::as_str)
            .and_then(UserRole::parse)
            .ok_or_else(|| TokenError::Malformed("role".into()))?;

        Ok(TokenPayload::new(sub, role))
    }
}
