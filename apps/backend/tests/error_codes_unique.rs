use std::collections::HashSet;

use starter_backend::errors::ErrorCode;

const ALL: &[ErrorCode] = &[
    ErrorCode::Unauthorized,
    ErrorCode::UnauthorizedMissingBearer,
    ErrorCode::UnauthorizedInvalidJwt,
    ErrorCode::UnauthorizedExpiredJwt,
    ErrorCode::UnauthorizedMalformedJwt,
    ErrorCode::Forbidden,
    ErrorCode::InsufficientRole,
    ErrorCode::InactiveUser,
    ErrorCode::InvalidOAuthState,
    ErrorCode::InvalidCredentials,
    ErrorCode::InvalidEmail,
    ErrorCode::InvalidPassword,
    ErrorCode::InvalidFilePath,
    ErrorCode::InvalidFilter,
    ErrorCode::UserAlreadyExists,
    ErrorCode::ValidationError,
    ErrorCode::UserNotFound,
    ErrorCode::ItemNotFound,
    ErrorCode::FileNotFound,
    ErrorCode::RecordNotFound,
    ErrorCode::UniqueEmail,
    ErrorCode::Conflict,
    ErrorCode::OAuthExchangeFailed,
    ErrorCode::StorageUnavailable,
    ErrorCode::UpstreamTimeout,
    ErrorCode::DbError,
    ErrorCode::DbUnavailable,
    ErrorCode::DbTimeout,
    ErrorCode::Internal,
    ErrorCode::ConfigError,
];

/// Fails to compile when a variant is added without extending `ALL`.
#[allow(dead_code)]
fn listed(code: ErrorCode) {
    match code {
        ErrorCode::Unauthorized => {}
        ErrorCode::UnauthorizedMissingBearer => {}
        ErrorCode::UnauthorizedInvalidJwt => {}
        ErrorCode::UnauthorizedExpiredJwt => {}
        ErrorCode::UnauthorizedMalformedJwt => {}
        ErrorCode::Forbidden => {}
        ErrorCode::InsufficientRole => {}
        ErrorCode::InactiveUser => {}
        ErrorCode::InvalidOAuthState => {}
        ErrorCode::InvalidCredentials => {}
        ErrorCode::InvalidEmail => {}
        ErrorCode::InvalidPassword => {}
        ErrorCode::InvalidFilePath => {}
        ErrorCode::InvalidFilter => {}
        ErrorCode::UserAlreadyExists => {}
        ErrorCode::ValidationError => {}
        ErrorCode::UserNotFound => {}
        ErrorCode::ItemNotFound => {}
        ErrorCode::FileNotFound => {}
        ErrorCode::RecordNotFound => {}
        ErrorCode::UniqueEmail => {}
        ErrorCode::Conflict => {}
        ErrorCode::OAuthExchangeFailed => {}
        ErrorCode::StorageUnavailable => {}
        ErrorCode::UpstreamTimeout => {}
        ErrorCode::DbError => {}
        ErrorCode::DbUnavailable => {}
        ErrorCode::DbTimeout => {}
        ErrorCode::Internal => {}
        ErrorCode::ConfigError => {}
    }
}

#[test]
fn error_codes_are_unique() {
    let mut seen = HashSet::new();
    for code in ALL {
        let s = code.as_str();
        assert!(seen.insert(s), "Duplicate error code string: {s}");
    }
}

#[test]
fn error_codes_are_screaming_snake_case() {
    for code in ALL {
        let s = code.as_str();
        assert!(
            s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'),
            "{s} is not SCREAMING_SNAKE_CASE"
        );
    }
}

#[test]
fn generic_fallback_codes_are_not_registered() {
    let strings: HashSet<&str> = ALL.iter().map(ErrorCode::as_str).collect();
    assert!(!strings.contains("BAD_REQUEST"));
    assert!(!strings.contains("NOT_FOUND"));
}
