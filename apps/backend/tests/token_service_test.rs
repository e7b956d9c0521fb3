mod common;

use std::sync::Arc;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use starter_backend::clock::ManualClock;
use starter_backend::{SecurityConfig, TokenError, TokenPayload, TokenService, UserRole};
use time::macros::datetime;
use time::Duration;
use uuid::Uuid;

fn service() -> (TokenService, ManualClock) {
    let clock = ManualClock::new(datetime!(2025-03-01 09:00 UTC));
    let security = SecurityConfig::new(b"integration-secret".to_vec())
        .with_access_ttl(Duration::minutes(15))
        .with_refresh_ttl(Duration::hours(24));
    (
        TokenService::with_clock(security, Arc::new(clock.clone())),
        clock,
    )
}

#[test]
fn access_token_round_trips_payload() {
    let (tokens, _clock) = service();
    let payload = TokenPayload::for_user(Uuid::new_v4(), UserRole::Superuser);
    let token = tokens.access_token(&payload).unwrap();

    let decoded = tokens.decode(&token).unwrap();
    assert_eq!(decoded, payload);
    assert!(decoded.is_superuser());
}

#[test]
fn access_token_expires_after_configured_ttl() {
    let (tokens, clock) = service();
    let payload = TokenPayload::for_user(Uuid::new_v4(), UserRole::User);
    let token = tokens.access_token(&payload).unwrap();

    clock.advance(Duration::minutes(15) - Duration::seconds(1));
    assert!(tokens.decode(&token).is_ok());

    clock.advance(Duration::seconds(1));
    assert_eq!(tokens.decode(&token), Err(TokenError::Expired));
}

#[test]
fn refresh_token_outlives_access_token() {
    let (tokens, clock) = service();
    let payload = TokenPayload::for_user(Uuid::new_v4(), UserRole::User);
    let access = tokens.access_token(&payload).unwrap();
    let refresh = tokens.refresh_token(&payload).unwrap();

    assert_eq!(refresh.expires_at, datetime!(2025-03-02 09:00 UTC));

    clock.advance(Duration::hours(1));
    assert_eq!(tokens.decode(&access), Err(TokenError::Expired));
    assert_eq!(tokens.decode(&refresh.token).unwrap(), payload);
}

#[test]
fn tampered_payload_is_invalid_signature() {
    let (tokens, _clock) = service();
    let token = tokens
        .access_token(&TokenPayload::new("someone", UserRole::User))
        .unwrap();

    let forged_claims = json!({ "sub": "someone", "role": "superuser", "exp": 4_102_444_800_i64 });
    let other = encode(
        &Header::new(Algorithm::HS256),
        &forged_claims,
        &EncodingKey::from_secret(b"attacker-secret"),
    )
    .unwrap();

    // Original header and signature around the attacker's payload.
    let original: Vec<&str> = token.split('.').collect();
    let forged_payload = other.split('.').nth(1).unwrap();
    let forged = format!("{}.{}.{}", original[0], forged_payload, original[2]);

    assert_eq!(tokens.decode(&forged), Err(TokenError::InvalidSignature));
}

/// Swaps a base64url character for one whose high data bit differs, so the
/// decoded bytes always change.
fn flip_char_at(token: &str, index: usize) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let mut bytes = token.as_bytes().to_vec();
    let sextet = ALPHABET.iter().position(|&c| c == bytes[index]).unwrap();
    bytes[index] = ALPHABET[sextet ^ 0b10_0000];
    String::from_utf8(bytes).unwrap()
}

#[test]
fn single_flipped_signature_byte_is_invalid_signature() {
    let (tokens, _clock) = service();
    let token = tokens
        .access_token(&TokenPayload::new("someone", UserRole::User))
        .unwrap();
    let signature_start = token.rfind('.').unwrap() + 1;

    let flipped = flip_char_at(&token, signature_start);
    assert_eq!(tokens.decode(&flipped), Err(TokenError::InvalidSignature));
}

#[test]
fn any_altered_character_is_invalid_signature() {
    let (tokens, _clock) = service();
    let token = tokens
        .access_token(&TokenPayload::new("someone", UserRole::User))
        .unwrap();

    for (index, c) in token.char_indices() {
        if c == '.' {
            continue;
        }
        let altered = flip_char_at(&token, index);
        assert_eq!(
            tokens.decode(&altered),
            Err(TokenError::InvalidSignature),
            "altering position {index} was accepted"
        );
    }
}

#[test]
fn other_algorithm_is_invalid_signature() {
    let (tokens, _clock) = service();
    let claims = json!({ "sub": "x", "role": "user", "exp": 4_102_444_800_i64 });
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(b"integration-secret"),
    )
    .unwrap();

    assert_eq!(tokens.decode(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn validly_signed_but_ill_typed_role_is_malformed() {
    let (tokens, _clock) = service();
    let claims = json!({ "sub": "x", "role": 7, "exp": 4_102_444_800_i64 });
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"integration-secret"),
    )
    .unwrap();

    assert!(matches!(tokens.decode(&token), Err(TokenError::Malformed(_))));
}

#[test]
fn otp_is_numeric_with_configured_expiry() {
    let (tokens, _clock) = service();
    let otp = tokens.generate_otp(6);
    assert_eq!(otp.code.len(), 6);
    assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(otp.expires_at, datetime!(2025-03-01 09:10 UTC));
}
