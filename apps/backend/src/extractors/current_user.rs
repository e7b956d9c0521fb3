use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use super::auth_token::AuthToken;
use crate::auth::{TokenError, TokenPayload, UserRole};
use crate::errors::ErrorCode;
use crate::logging::security;
use crate::state::app_state::AppState;
use crate::AppError;

/// Caller identity decoded from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_superuser(&self) -> bool {
        self.role == UserRole::Superuser
    }

    fn from_payload(payload: TokenPayload) -> Result<Self, AppError> {
        let id = payload.user_id().ok_or_else(|| {
            security::token_rejected("sub_not_uuid");
            AppError::unauthorized_malformed_jwt()
        })?;
        Ok(Self {
            id,
            role: payload.role,
        })
    }

    fn extract(req: &HttpRequest) -> Result<Self, AppError> {
        let token = AuthToken::from_request_headers(req)?;
        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| AppError::internal("AppState not available"))?;

        let payload = state.tokens.decode(&token.token).map_err(|e| {
            security::token_rejected(match &e {
                TokenError::InvalidSignature => "invalid_signature",
                TokenError::Expired => "expired",
                TokenError::Malformed(_) => "malformed",
                TokenError::Encode(_) => "encode",
            });
            AppError::from(e)
        })?;

        Self::from_payload(payload)
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}

/// A [`CurrentUser`] whose role is superuser; anyone else gets 403.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superuser(pub CurrentUser);

impl FromRequest for Superuser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(CurrentUser::extract(req).and_then(|user| {
            if user.is_superuser() {
                Ok(Superuser(user))
            } else {
                Err(AppError::forbidden(
                    ErrorCode::InsufficientRole,
                    "The user doesn't have enough privileges",
                ))
            }
        }))
    }
}
