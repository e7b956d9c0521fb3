//! Account lifecycle: signup, login, token refresh, deactivation, password
//! changes, Google sign-in and the bootstrap superuser.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{TokenPayload, TokenService, UserRole};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::oauth::GoogleIdentity;
use crate::repos::users::{self, User, UserCreate, UserUpdate};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 40;

/// A logged-in user with a fresh token pair.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub refresh_expires_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub refresh_expires_at: OffsetDateTime,
}

/// Trims, NFKC-normalizes and lowercases an email, then checks its shape.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().nfkc().collect::<String>().to_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid || email.len() > 255 {
        return Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "Email address is not valid",
        ));
    }
    Ok(email)
}

fn check_password_policy(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            format!("Password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

fn issue_pair(tokens: &TokenService, user: &User) -> Result<TokenPair, AppError> {
    let payload = TokenPayload::for_user(user.id, user.role);
    let access_token = tokens.access_token(&payload)?;
    let refresh = tokens.refresh_token(&payload)?;
    Ok(TokenPair {
        access_token,
        refresh_token: refresh.token,
        refresh_expires_at: refresh.expires_at,
    })
}

fn session(tokens: &TokenService, user: User) -> Result<AuthSession, AppError> {
    let pair = issue_pair(tokens, &user)?;
    Ok(AuthSession {
        user,
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        refresh_expires_at: pair.refresh_expires_at,
    })
}

/// Registers a standard user. A taken email is a bad request, not a conflict.
pub async fn signup<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password: &str,
    full_name: Option<String>,
) -> Result<User, AppError> {
    let email = normalize_email(email)?;
    check_password_policy(password)?;

    if users::find_user_by_email(conn, &email).await?.is_some() {
        return Err(AppError::bad_request(
            ErrorCode::UserAlreadyExists,
            "User already exists in the system",
        ));
    }

    let password_hash = hash_password(password)?;
    let mut dto = UserCreate::new(email, password_hash).with_role(UserRole::User);
    dto.full_name = full_name;

    let user = users::create_user(conn, dto).await?;
    info!(user_id = %user.id, email = %Redacted(&user.email), "User signed up");
    Ok(user)
}

/// Creates the bootstrap superuser unless an account with that email exists.
/// Returns the new user, or `None` when nothing was created. An existing
/// account is left untouched, whatever its role.
pub async fn ensure_superuser<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let email = normalize_email(email)?;
    if users::find_user_by_email(conn, &email).await?.is_some() {
        debug!(email = %Redacted(&email), "Superuser already present");
        return Ok(None);
    }
    check_password_policy(password)?;

    let password_hash = hash_password(password)?;
    let dto = UserCreate::new(email, password_hash).with_role(UserRole::Superuser);
    let user = users::create_user(conn, dto).await?;
    info!(user_id = %user.id, email = %Redacted(&user.email), "Superuser seeded");
    Ok(Some(user))
}

pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<AuthSession, AppError> {
    let email = normalize_email(email)?;

    let Some(credentials) = users::find_credentials_by_email(conn, &email).await? else {
        security::login_failed("unknown_email", Some(&email));
        return Err(AppError::not_found(
            ErrorCode::UserNotFound,
            "User does not exist in the system",
        ));
    };

    if !verify_password(password, &credentials.password_hash) {
        security::login_failed("bad_password", Some(&email));
        return Err(AppError::bad_request(
            ErrorCode::InvalidCredentials,
            "Incorrect email or password",
        ));
    }

    if !credentials.user.is_active {
        security::login_failed("inactive", Some(&email));
        return Err(AppError::forbidden(
            ErrorCode::InactiveUser,
            "User account is inactive",
        ));
    }

    info!(user_id = %credentials.user.id, "User logged in");
    session(tokens, credentials.user)
}

/// Exchanges a valid refresh token for a new pair. The subject must still
/// exist and be active.
pub async fn refresh<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tokens: &TokenService,
    refresh_token: &str,
) -> Result<TokenPair, AppError> {
    let payload = tokens.decode(refresh_token).map_err(|e| {
        security::token_rejected("refresh_decode");
        AppError::from(e)
    })?;

    let user_id = payload
        .user_id()
        .ok_or_else(AppError::unauthorized_malformed_jwt)?;
    let user = users::find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    if !user.is_active {
        return Err(AppError::forbidden(
            ErrorCode::InactiveUser,
            "User account is inactive",
        ));
    }

    issue_pair(tokens, &user)
}

/// Marks the caller's account inactive. Superusers cannot deactivate themselves.
pub async fn deactivate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
    role: UserRole,
) -> Result<User, AppError> {
    if role == UserRole::Superuser {
        return Err(AppError::forbidden(
            ErrorCode::Forbidden,
            "Superusers are not allowed to deactivate themselves",
        ));
    }

    let update = UserUpdate {
        is_active: Some(false),
        ..UserUpdate::default()
    };
    let user = users::update_user(conn, id, update)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    info!(user_id = %user.id, "User deactivated");
    Ok(user)
}

pub async fn update_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: Uuid,
    current_password: &str,
    new_password: &str,
) -> Result<User, AppError> {
    let Some(credentials) = users::find_credentials_by_id(conn, id).await? else {
        return Err(AppError::not_found(
            ErrorCode::UserNotFound,
            "Password cannot be updated at this time",
        ));
    };

    if !verify_password(current_password, &credentials.password_hash) {
        security::login_failed("bad_current_password", Some(&credentials.user.email));
        return Err(AppError::bad_request(
            ErrorCode::InvalidCredentials,
            "Incorrect password",
        ));
    }
    check_password_policy(new_password)?;

    let update = UserUpdate {
        password_hash: Some(hash_password(new_password)?),
        ..UserUpdate::default()
    };
    let user = users::update_user(conn, id, update)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))?;

    info!(user_id = %user.id, "Password updated");
    Ok(user)
}

/// Finds or creates the user for a Google identity and issues a token pair.
///
/// New accounts get a random password so password login stays closed until
/// the user sets one.
pub async fn login_with_google<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tokens: &TokenService,
    identity: &GoogleIdentity,
) -> Result<AuthSession, AppError> {
    if identity.email_verified == Some(false) {
        security::login_failed("google_email_unverified", Some(&identity.email));
        return Err(AppError::forbidden(
            ErrorCode::Forbidden,
            "Google account email is not verified",
        ));
    }
    let email = normalize_email(&identity.email)?;

    let user = match users::find_user_by_email(conn, &email).await? {
        Some(user) => user,
        None => {
            let secret: [u8; 32] = rand::random();
            let password_hash = hash_password(&blake3::hash(&secret).to_hex())?;
            let mut dto = UserCreate::new(email, password_hash);
            dto.full_name = identity.name.clone();
            let user = users::create_user(conn, dto).await?;
            info!(user_id = %user.id, email = %Redacted(&user.email), "User created from Google sign-in");
            user
        }
    };

    if !user.is_active {
        security::login_failed("inactive", Some(&user.email));
        return Err(AppError::forbidden(
            ErrorCode::InactiveUser,
            "User account is inactive",
        ));
    }

    session(tokens, user)
}
