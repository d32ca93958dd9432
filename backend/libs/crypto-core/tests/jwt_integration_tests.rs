/// Integration tests for crypto-core token functionality
///
/// This test module covers:
/// - Sign/verify round trips for arbitrary principals
/// - Rejection of tokens signed with a different secret
/// - Expiry handling (non-positive durations, advanced clock)
/// - Algorithm confusion and malformed input
use chrono::{Duration, Utc};
use crypto_core::jwt::{Claims, TokenCodec, TokenError};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
const OTHER_SECRET: &str = "a-completely-different-secret-fedcba9876";

fn codec(secret: &str, duration: Duration) -> TokenCodec {
    TokenCodec::new(secret, duration).expect("Failed to build codec")
}

#[test]
fn test_round_trip_preserves_principal() {
    let codec = codec(TEST_SECRET, Duration::minutes(15));

    let principals = [
        ("admin1", "admin"),
        ("user1", "user"),
        ("someone.with.dots", "auditor"),
        ("名前", "user"),
        ("", ""),
    ];

    for (username, role) in principals {
        let token = codec.sign(username, role).expect("Failed to sign token");
        let claims = codec.verify(&token).expect("Token should verify");

        assert_eq!(claims.username, username);
        assert_eq!(claims.role, role);
    }
}

#[test]
fn test_token_from_other_secret_rejected() {
    let issuer = codec(TEST_SECRET, Duration::minutes(15));
    let verifier = codec(OTHER_SECRET, Duration::minutes(15));

    let token = issuer.sign("admin1", "admin").expect("Failed to sign token");

    assert_eq!(verifier.verify(&token), Err(TokenError::SignatureMismatch));
}

#[test]
fn test_tampered_payload_rejected() {
    let codec = codec(TEST_SECRET, Duration::minutes(15));
    let user_token = codec.sign("user1", "user").expect("Failed to sign token");
    let admin_token = codec.sign("admin1", "admin").expect("Failed to sign token");

    // Splice the admin payload onto the user's signature
    let user_parts: Vec<&str> = user_token.split('.').collect();
    let admin_parts: Vec<&str> = admin_token.split('.').collect();
    let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

    assert_eq!(codec.verify(&forged), Err(TokenError::SignatureMismatch));
}

#[test]
fn test_zero_duration_token_is_expired() {
    let codec = codec(TEST_SECRET, Duration::zero());
    let token = codec.sign("admin1", "admin").expect("Failed to sign token");

    assert_eq!(codec.verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_negative_duration_token_is_expired() {
    let codec = codec(TEST_SECRET, Duration::minutes(-5));
    let token = codec.sign("admin1", "admin").expect("Failed to sign token");

    assert_eq!(codec.verify(&token), Err(TokenError::Expired));
}

#[test]
fn test_token_expires_when_clock_advances() {
    let codec = codec(TEST_SECRET, Duration::minutes(15));
    let issued = Utc::now();
    let token = codec
        .sign_at("user1", "user", issued)
        .expect("Failed to sign token");

    assert!(codec.verify_at(&token, issued + Duration::minutes(14)).is_ok());
    assert_eq!(
        codec.verify_at(&token, issued + Duration::minutes(16)),
        Err(TokenError::Expired)
    );
}

#[test]
fn test_other_algorithm_rejected() {
    let claims = Claims {
        username: "admin1".to_string(),
        role: "admin".to_string(),
        iat: Utc::now().timestamp(),
        exp: (Utc::now() + Duration::minutes(15)).timestamp(),
    };

    // Same secret, different HMAC variant
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to encode token");

    let result = codec(TEST_SECRET, Duration::minutes(15)).verify(&token);
    assert_eq!(result, Err(TokenError::AlgorithmMismatch));
}

#[test]
fn test_malformed_tokens_rejected() {
    let codec = codec(TEST_SECRET, Duration::minutes(15));

    for token in ["", "abc", "a.b.c", "invalid.token.here"] {
        let result = codec.verify(token);
        assert!(
            matches!(result, Err(TokenError::Malformed(_))),
            "expected malformed for {token:?}, got {result:?}"
        );
    }
}

#[test]
fn test_claims_carry_validity_window() {
    let codec = codec(TEST_SECRET, Duration::minutes(15));
    let issued = Utc::now();
    let token = codec
        .sign_at("user1", "user", issued)
        .expect("Failed to sign token");

    let claims = codec.verify_at(&token, issued).expect("Token should verify");

    assert_eq!(claims.iat, issued.timestamp());
    assert_eq!(claims.exp, (issued + Duration::minutes(15)).timestamp());
}

#[test]
fn test_unrepresentable_durations_never_reach_signing() {
    let result = TokenCodec::new(TEST_SECRET, Duration::seconds(10_000_000_000_000));
    assert_eq!(result.err(), Some(TokenError::InvalidDuration));

    // The longest accepted duration still signs and verifies
    let codec = codec(TEST_SECRET, Duration::days(365));
    let token = codec.sign("admin1", "admin").expect("Failed to sign token");
    assert_eq!(codec.verify(&token).expect("Token should verify").role, "admin");
}
