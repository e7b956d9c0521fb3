//! Error codes for the backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in the `code` field of a Problem Details response.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Token signature or structure rejected
    UnauthorizedInvalidJwt,
    /// Token has expired
    UnauthorizedExpiredJwt,
    /// Token verified but its claims are unusable
    UnauthorizedMalformedJwt,
    /// Access denied
    Forbidden,
    /// Caller's role does not allow the operation
    InsufficientRole,
    /// Account has been deactivated
    InactiveUser,
    /// OAuth state unknown, expired or already used
    InvalidOAuthState,

    // Request Validation
    /// Wrong password or otherwise rejected credentials
    InvalidCredentials,
    /// Invalid email address
    InvalidEmail,
    /// Password rejected by policy
    InvalidPassword,
    /// Storage path escapes the storage root or is empty
    InvalidFilePath,
    /// Search filter names an unknown field or unsupported value
    InvalidFilter,
    /// Account with this email already exists
    UserAlreadyExists,
    /// General validation error
    ValidationError,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// Item not found
    ItemNotFound,
    /// Stored file not found
    FileNotFound,
    /// Record not found (generic 404 for DB-driven not-found)
    RecordNotFound,

    // Conflicts
    /// Unique email constraint
    UniqueEmail,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // Upstream
    /// OAuth provider rejected or failed the code exchange
    OAuthExchangeFailed,
    /// Object store request failed
    StorageUnavailable,
    /// Outbound request timed out
    UpstreamTimeout,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::UnauthorizedMalformedJwt => "UNAUTHORIZED_MALFORMED_JWT",
            Self::Forbidden => "FORBIDDEN",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::InactiveUser => "INACTIVE_USER",
            Self::InvalidOAuthState => "INVALID_OAUTH_STATE",

            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidFilePath => "INVALID_FILE_PATH",
            Self::InvalidFilter => "INVALID_FILTER",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",

            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::Conflict => "CONFLICT",

            Self::OAuthExchangeFailed => "OAUTH_EXCHANGE_FAILED",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
