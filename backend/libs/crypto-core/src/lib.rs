//! Cryptographic primitives shared by the PCBook services
//!
//! - [`jwt`]: signing and verification of access tokens with a shared HS256 secret
//! - [`hash`]: Argon2id password hashing for stored credentials

pub mod hash;
pub mod jwt;

pub use hash::{hash_password, verify_password, PasswordError};
pub use jwt::{Claims, TokenCodec, TokenError};
