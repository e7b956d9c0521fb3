mod common;
mod support;

use starter_backend::oauth::GoogleIdentity;
use starter_backend::services::auth;
use starter_backend::{ErrorCode, UserRole};
use support::{seed_user, test_db, test_state, SEED_PASSWORD};

fn identity(email: &str) -> GoogleIdentity {
    GoogleIdentity {
        sub: "google-123".into(),
        email: email.into(),
        email_verified: Some(true),
        name: Some("Grace Hopper".into()),
        given_name: None,
        family_name: None,
        picture: None,
        aud: None,
    }
}

#[tokio::test]
async fn signup_normalises_email_and_assigns_user_role() {
    let db = test_db().await;
    let user = auth::signup(&db, "  New.Person@Example.TEST ", "long-enough-pw", Some("New".into()))
        .await
        .unwrap();

    assert_eq!(user.email, "new.person@example.test");
    assert_eq!(user.role, UserRole::User);
    assert!(user.is_active);
    assert_eq!(user.full_name.as_deref(), Some("New"));
}

#[tokio::test]
async fn duplicate_signup_is_bad_request() {
    let db = test_db().await;
    let email = common::unique_email("dup");
    auth::signup(&db, &email, "long-enough-pw", None).await.unwrap();

    let err = auth::signup(&db, &email.to_uppercase(), "long-enough-pw", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UserAlreadyExists);
    assert_eq!(err.status().as_u16(), 400);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let db = test_db().await;
    let err = auth::signup(&db, &common::unique_email("short"), "short", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPassword);
}

#[tokio::test]
async fn login_issues_tokens_for_the_user() {
    let db = test_db().await;
    let state = test_state(db.clone()).await;
    let email = common::unique_email("login");
    let user = seed_user(&db, &email, UserRole::User).await;

    let session = auth::login(&db, &state.tokens, &email, SEED_PASSWORD)
        .await
        .unwrap();

    assert_eq!(session.user.id, user.id);
    let access = state.tokens.decode(&session.access_token).unwrap();
    assert_eq!(access.user_id(), Some(user.id));
    assert_eq!(access.role, UserRole::User);
    let refresh = state.tokens.decode(&session.refresh_token).unwrap();
    assert_eq!(refresh.user_id(), Some(user.id));
}

#[tokio::test]
async fn login_failures_map_to_distinct_errors() {
    let db = test_db().await;
    let state = test_state(db.clone()).await;
    let email = common::unique_email("login");
    seed_user(&db, &email, UserRole::User).await;

    let unknown = auth::login(&db, &state.tokens, &common::unique_email("ghost"), SEED_PASSWORD)
        .await
        .unwrap_err();
    assert_eq!(unknown.code(), ErrorCode::UserNotFound);
    assert_eq!(unknown.status().as_u16(), 404);

    let wrong = auth::login(&db, &state.tokens, &email, "not-the-password")
        .await
        .unwrap_err();
    assert_eq!(wrong.code(), ErrorCode::InvalidCredentials);
    assert_eq!(wrong.status().as_u16(), 400);
}

#[tokio::test]
async fn refresh_returns_a_new_pair() {
    let db = test_db().await;
    let state = test_state(db.clone()).await;
    let email = common::unique_email("refresh");
    let user = seed_user(&db, &email, UserRole::User).await;
    let session = auth::login(&db, &state.tokens, &email, SEED_PASSWORD)
        .await
        .unwrap();

    let pair = auth::refresh(&db, &state.tokens, &session.refresh_token)
        .await
        .unwrap();
    assert_eq!(
        state.tokens.decode(&pair.access_token).unwrap().user_id(),
        Some(user.id)
    );

    let err = auth::refresh(&db, &state.tokens, "garbage").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnauthorizedInvalidJwt);
}

#[tokio::test]
async fn deactivation_blocks_login_and_refresh() {
    let db = test_db().await;
    let state = test_state(db.clone()).await;
    let email = common::unique_email("leaving");
    let user = seed_user(&db, &email, UserRole::User).await;
    let session = auth::login(&db, &state.tokens, &email, SEED_PASSWORD)
        .await
        .unwrap();

    let deactivated = auth::deactivate(&db, user.id, user.role).await.unwrap();
    assert!(!deactivated.is_active);

    let err = auth::login(&db, &state.tokens, &email, SEED_PASSWORD)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InactiveUser);
    assert_eq!(err.status().as_u16(), 403);

    let err = auth::refresh(&db, &state.tokens, &session.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InactiveUser);
}

#[tokio::test]
async fn superusers_cannot_deactivate_themselves() {
    let db = test_db().await;
    let admin = seed_user(&db, &common::unique_email("admin"), UserRole::Superuser).await;

    let err = auth::deactivate(&db, admin.id, admin.role).await.unwrap_err();
    assert_eq!(err.status().as_u16(), 403);
}

#[tokio::test]
async fn update_password_requires_current_password() {
    let db = test_db().await;
    let state = test_state(db.clone()).await;
    let email = common::unique_email("rotate");
    let user = seed_user(&db, &email, UserRole::User).await;

    let err = auth::update_password(&db, user.id, "wrong-current", "brand-new-secret")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCredentials);

    auth::update_password(&db, user.id, SEED_PASSWORD, "brand-new-secret")
        .await
        .unwrap();
    assert!(auth::login(&db, &state.tokens, &email, SEED_PASSWORD)
        .await
        .is_err());
    assert!(auth::login(&db, &state.tokens, &email, "brand-new-secret")
        .await
        .is_ok());
}

#[tokio::test]
async fn google_login_creates_then_reuses_user() {
    let db = test_db().await;
    let state = test_state(db.clone()).await;
    let email = common::unique_email("google");

    let first = auth::login_with_google(&db, &state.tokens, &identity(&email))
        .await
        .unwrap();
    assert_eq!(first.user.full_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(first.user.role, UserRole::User);

    let second = auth::login_with_google(&db, &state.tokens, &identity(&email))
        .await
        .unwrap();
    assert_eq!(first.user.id, second.user.id);
}

#[tokio::test]
async fn google_login_rejects_unverified_email() {
    let db = test_db().await;
    let state = test_state(db.clone()).await;
    let mut unverified = identity(&common::unique_email("google"));
    unverified.email_verified = Some(false);

    let err = auth::login_with_google(&db, &state.tokens, &unverified)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn ensure_superuser_creates_once() {
    let db = test_db().await;
    let state = test_state(db.clone()).await;
    let email = common::unique_email("root");

    let created = auth::ensure_superuser(&db, &email, "root-password-1")
        .await
        .unwrap()
        .expect("first call creates the account");
    assert_eq!(created.role, UserRole::Superuser);
    assert!(created.is_active);

    let again = auth::ensure_superuser(&db, &email.to_uppercase(), "other-password-2")
        .await
        .unwrap();
    assert!(again.is_none());

    // The original password still works; the second call changed nothing.
    let session = auth::login(&db, &state.tokens, &email, "root-password-1")
        .await
        .unwrap();
    assert_eq!(session.user.id, created.id);
    assert!(state.tokens.decode(&session.access_token).unwrap().is_superuser());
}

#[tokio::test]
async fn ensure_superuser_leaves_an_existing_account_alone() {
    let db = test_db().await;
    let email = common::unique_email("taken");
    let existing = seed_user(&db, &email, UserRole::User).await;

    assert!(auth::ensure_superuser(&db, &email, "root-password-1")
        .await
        .unwrap()
        .is_none());
    let user = starter_backend::repos::users::find_user_by_id(&db, existing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.role, UserRole::User);
}

#[tokio::test]
async fn state_builder_seeds_the_configured_superuser() {
    let db = test_db().await;
    let email = common::unique_email("boot");
    let config = starter_backend::config::SuperuserConfig {
        email: email.clone(),
        password: "root-password-1".into(),
    };

    for _ in 0..2 {
        starter_backend::build_state()
            .with_db(db.clone())
            .with_superuser(config.clone())
            .build()
            .await
            .unwrap();
    }

    let user = starter_backend::repos::users::find_user_by_email(&db, &email)
        .await
        .unwrap()
        .expect("superuser seeded at startup");
    assert_eq!(user.role, UserRole::Superuser);
}
