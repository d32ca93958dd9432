/// Access token codec for PCBook services
///
/// Tokens are JWTs signed with a single shared secret using HS256. The issuing side
/// (login) and the verifying side (server call gate) of one service boundary hold the
/// same [`TokenCodec`].
///
/// ## Security Design
///
/// - **HS256 ONLY**: tokens announcing any other algorithm are rejected before the
///   signature is checked
/// - **Strict expiry**: a token is valid only while `now < exp`, with no leeway
/// - **Opaque secret**: the secret is consumed at construction and never logged
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt::TokenCodec;
///
/// let codec = TokenCodec::new("a-long-shared-secret", chrono::Duration::minutes(15)).unwrap();
/// let token = codec.sign("admin1", "admin").unwrap();
/// let claims = codec.verify(&token).unwrap();
/// assert_eq!(claims.role, "admin");
/// ```
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// JWT algorithm - MUST be HS256 on both sides of the boundary
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Longest accepted token validity, in either direction
const MAX_TOKEN_DURATION_DAYS: i64 = 365;

// ============================================================================
// Data Structures
// ============================================================================

/// Signed payload identifying a principal and its validity window
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Username of the principal
    pub username: String,
    /// Coarse-grained role compared against the access policy
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Whether the claims are still valid at `now` (strictly before expiry)
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.exp
    }
}

/// Failures produced by [`TokenCodec`]
///
/// The verification variants all surface to callers as a single "invalid token"
/// outcome; they stay distinct here for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("token duration must be within 365 days")]
    InvalidDuration,

    #[error("cannot sign access token: {0}")]
    Signing(String),

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not match")]
    SignatureMismatch,

    #[error("unexpected token signing method")]
    AlgorithmMismatch,

    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// True for failures of `verify`, false for construction and signing failures
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self,
            TokenError::Malformed(_)
                | TokenError::SignatureMismatch
                | TokenError::AlgorithmMismatch
                | TokenError::Expired
        )
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::AlgorithmMismatch
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Signs and verifies access tokens with a shared secret
///
/// Holds no mutable state after construction, so one instance can be shared behind an
/// `Arc` by any number of concurrent calls.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_duration: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &JWT_ALGORITHM)
            .field("token_duration", &self.token_duration)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from the shared secret and the validity of issued tokens
    ///
    /// A non-positive `token_duration` is accepted and yields tokens that are already expired.
    ///
    /// ## Errors
    ///
    /// - [`TokenError::EmptySecret`] if `secret` is empty
    /// - [`TokenError::InvalidDuration`] if `token_duration` exceeds one year in either direction
    pub fn new(secret: &str, token_duration: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let max = Duration::days(MAX_TOKEN_DURATION_DAYS);
        if token_duration > max || token_duration < -max {
            return Err(TokenError::InvalidDuration);
        }

        let mut validation = Validation::new(JWT_ALGORITHM);
        // Expiry is checked against an explicit clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_duration,
        })
    }

    /// Validity window applied to every signed token
    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    /// Sign a token for `username` / `role` expiring at `now + token_duration`
    pub fn sign(&self, username: &str, role: &str) -> Result<String, TokenError> {
        self.sign_at(username, role, Utc::now())
    }

    /// Sign a token as if the current time were `now`
    ///
    /// ## Errors
    ///
    /// Returns [`TokenError::Signing`] if the expiry falls outside the representable time range
    /// or the JWT cannot be encoded.
    pub fn sign_at(
        &self,
        username: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = now
            .checked_add_signed(self.token_duration)
            .ok_or_else(|| TokenError::Signing("token expiry is out of range".to_string()))?;

        let claims = Claims {
            username: username.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token against an explicit clock
    ///
    /// ## Errors
    ///
    /// - [`TokenError::Malformed`] if the token is not a decodable JWT
    /// - [`TokenError::AlgorithmMismatch`] if the header names another algorithm
    /// - [`TokenError::SignatureMismatch`] if it was signed with another secret
    /// - [`TokenError::Expired`] if `now` is not strictly before `exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        if !token_data.claims.is_valid_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

// ============================================================================
// Tests
// ============================================================================
