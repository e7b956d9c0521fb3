// Unit tests for DomainError -> AppError mapping, no HTTP or database involved
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::storage::StorageError;
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_422() {
    let de = DomainError::validation(ValidationKind::InvalidEmail, "bad email");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::InvalidEmail);
    assert_eq!(app.status().as_u16(), 422);

    let other = DomainError::validation_other("bad field");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
}

#[test]
fn maps_conflicts() {
    let unique = DomainError::conflict(ConflictKind::UniqueEmail, "email exists");
    let app: AppError = unique.into();
    assert_eq!(app.code().as_str(), "UNIQUE_EMAIL");
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(ConflictKind::Other("Unique".into()), "generic");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found_per_entity() {
    let app: AppError = DomainError::not_found(NotFoundKind::User, "no user").into();
    assert_eq!(app.code(), ErrorCode::UserNotFound);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::not_found(NotFoundKind::Item, "no item").into();
    assert_eq!(app.code(), ErrorCode::ItemNotFound);

    let app: AppError =
        DomainError::not_found(NotFoundKind::Other("Record".into()), "missing").into();
    assert_eq!(app.code(), ErrorCode::RecordNotFound);
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.code(), ErrorCode::DbTimeout);
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code(), ErrorCode::DbUnavailable);
    assert_eq!(app.status().as_u16(), 503);

    let app: AppError = DomainError::infra(InfraErrorKind::Other("DbErr".into()), "x").into();
    assert_eq!(app.code(), ErrorCode::DbError);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn maps_storage_errors() {
    let app: AppError = StorageError::InvalidPath("../etc".into()).into();
    assert_eq!(app.code(), ErrorCode::InvalidFilePath);
    assert_eq!(app.status().as_u16(), 400);

    let app: AppError = StorageError::NotFound("a.txt".into()).into();
    assert_eq!(app.code(), ErrorCode::FileNotFound);

    let app: AppError = StorageError::Backend("s3 down".into()).into();
    assert_eq!(app.code(), ErrorCode::StorageUnavailable);
    assert_eq!(app.status().as_u16(), 502);
}
