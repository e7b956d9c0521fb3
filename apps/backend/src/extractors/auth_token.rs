use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::logging::security;
use crate::AppError;

/// Raw bearer token from the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
}

impl AuthToken {
    /// Accepts `Bearer <token>` with a case-insensitive scheme and exactly one token.
    pub fn parse(header_value: &str) -> Option<Self> {
        let mut parts = header_value.split_whitespace();
        let scheme = parts.next()?;
        let token = parts.next()?;
        if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        Some(Self {
            token: token.to_string(),
        })
    }

    pub fn from_request_headers(req: &HttpRequest) -> Result<Self, AppError> {
        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(AppError::unauthorized_missing_bearer)?;
        let value = value.to_str().map_err(|_| {
            security::token_rejected("non_ascii_header");
            AppError::unauthorized_missing_bearer()
        })?;
        Self::parse(value).ok_or_else(|| {
            security::token_rejected("bad_scheme");
            AppError::unauthorized_missing_bearer()
        })
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_request_headers(req))
    }
}
