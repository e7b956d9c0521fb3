use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::auth::jwt::TokenError;
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::oauth::OAuthError;
use crate::query::FilterError;
use crate::storage::StorageError;
use crate::tasks::TaskError;

/// RFC 7807 body rendered for every error response.
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Database unavailable: {detail}")]
    DbUnavailable { detail: String },
    #[error("Timeout: {detail}")]
    Timeout { code: ErrorCode, detail: String },
    #[error("Upstream failure: {detail}")]
    BadGateway { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::Unauthorized { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Timeout { code, .. }
            | AppError::BadGateway { code, .. }
            | AppError::Internal { code, .. } => *code,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::DbUnavailable { .. } => ErrorCode::DbUnavailable,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::Unauthorized { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Db { detail }
            | AppError::DbUnavailable { detail }
            | AppError::Timeout { detail, .. }
            | AppError::BadGateway { detail, .. }
            | AppError::Internal { detail, .. }
            | AppError::Config { detail } => detail,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DbUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
            status: StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::Internal,
            detail: detail.into(),
        }
    }

    pub fn bad_gateway(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadGateway {
            code,
            detail: detail.into(),
        }
    }

    pub fn timeout(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Timeout {
            code,
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable(detail: impl Into<String>) -> Self {
        Self::DbUnavailable {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            code: ErrorCode::Unauthorized,
            detail: "Authentication required".to_string(),
        }
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedMissingBearer,
            detail: "Missing or malformed Bearer token".to_string(),
        }
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedInvalidJwt,
            detail: "Invalid token".to_string(),
        }
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedExpiredJwt,
            detail: "Token expired".to_string(),
        }
    }

    pub fn unauthorized_malformed_jwt() -> Self {
        Self::Unauthorized {
            code: ErrorCode::UnauthorizedMalformedJwt,
            detail: "Token claims are missing or invalid".to_string(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::InvalidEmail => ErrorCode::InvalidEmail,
                    ValidationKind::InvalidFilter => ErrorCode::InvalidFilter,
                    ValidationKind::ForeignKey | ValidationKind::Other(_) => {
                        ErrorCode::ValidationError
                    }
                };
                AppError::invalid(code, detail)
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::UniqueEmail => ErrorCode::UniqueEmail,
                    ConflictKind::Other(_) => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::User => ErrorCode::UserNotFound,
                    NotFoundKind::Item => ErrorCode::ItemNotFound,
                    NotFoundKind::File => ErrorCode::FileNotFound,
                    NotFoundKind::Other(_) => ErrorCode::RecordNotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::Timeout => AppError::timeout(ErrorCode::DbTimeout, detail),
                InfraErrorKind::DbUnavailable => AppError::db_unavailable(detail),
                InfraErrorKind::Other(_) => AppError::db(detail),
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(crate::infra::db_errors::map_db_err(e))
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidSignature => AppError::unauthorized_invalid_jwt(),
            TokenError::Expired => AppError::unauthorized_expired_jwt(),
            TokenError::Malformed(_) => AppError::unauthorized_malformed_jwt(),
            TokenError::Encode(detail) => AppError::internal(format!("token encoding failed: {detail}")),
        }
    }
}

impl From<FilterError> for AppError {
    fn from(e: FilterError) -> Self {
        AppError::bad_request(ErrorCode::InvalidFilter, e.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidPath(_) => {
                AppError::bad_request(ErrorCode::InvalidFilePath, e.to_string())
            }
            StorageError::NotFound(_) => AppError::not_found(ErrorCode::FileNotFound, e.to_string()),
            StorageError::Backend(_) => {
                AppError::bad_gateway(ErrorCode::StorageUnavailable, e.to_string())
            }
            StorageError::Io(_) => AppError::internal(e.to_string()),
            StorageError::Config(_) => AppError::config(e.to_string()),
        }
    }
}

impl From<OAuthError> for AppError {
    fn from(e: OAuthError) -> Self {
        match e {
            OAuthError::InvalidState => {
                AppError::bad_request(ErrorCode::InvalidOAuthState, e.to_string())
            }
            OAuthError::Timeout => AppError::timeout(ErrorCode::UpstreamTimeout, e.to_string()),
            OAuthError::Transport(_)
            | OAuthError::Provider { .. }
            | OAuthError::MissingIdToken
            | OAuthError::InvalidIdToken(_) => {
                AppError::bad_gateway(ErrorCode::OAuthExchangeFailed, e.to_string())
            }
            OAuthError::Store(_) => AppError::internal(e.to_string()),
        }
    }
}

impl From<TaskError> for AppError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::Address(_) => AppError::invalid(ErrorCode::InvalidEmail, e.to_string()),
            TaskError::QueueFull => AppError::Internal {
                code: ErrorCode::Internal,
                detail: "Task queue is full, try again later".to_string(),
            },
            TaskError::Message(_) | TaskError::Transport(_) | TaskError::QueueClosed => {
                AppError::internal(e.to_string())
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();

        let problem_details = ProblemDetails {
            type_: format!("https://api.starter.dev/errors/{}", code.as_str()),
            title: Self::humanize_code(code.as_str()),
            status: status.as_u16(),
            detail: self.detail().to_string(),
            code: code.as_str().to_string(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .json(problem_details)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    #[test]
    fn humanize_code_title_cases_each_word() {
        assert_eq!(AppError::humanize_code("ITEM_NOT_FOUND"), "Item Not Found");
        assert_eq!(AppError::humanize_code("INTERNAL"), "Internal");
    }

    #[actix_web::test]
    async fn error_response_renders_problem_details() {
        let err = AppError::not_found(ErrorCode::ItemNotFound, "Item not found");
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let content_type = resp
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.contains("application/problem+json"));

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "ITEM_NOT_FOUND");
        assert_eq!(json["status"], 404);
        assert_eq!(json["title"], "Item Not Found");
        assert_eq!(json["detail"], "Item not found");
        assert!(json["type"].as_str().unwrap().ends_with("ITEM_NOT_FOUND"));
    }

    #[test]
    fn token_errors_map_to_distinct_unauthorized_codes() {
        let cases = [
            (TokenError::InvalidSignature, ErrorCode::UnauthorizedInvalidJwt),
            (TokenError::Expired, ErrorCode::UnauthorizedExpiredJwt),
            (
                TokenError::Malformed("sub".into()),
                ErrorCode::UnauthorizedMalformedJwt,
            ),
        ];
        for (token_err, code) in cases {
            let app: AppError = token_err.into();
            assert_eq!(app.code(), code);
            assert_eq!(app.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
