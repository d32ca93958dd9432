/// Stored credential: username, Argon2id password hash and role
use crate::error::Result;
use crypto_core::{hash_password, verify_password};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub role: String,
    password_hash: String,
}

impl User {
    /// Create a user, hashing `password`; the plaintext is not retained
    pub fn new(username: impl Into<String>, password: &str, role: impl Into<String>) -> Result<Self> {
        Ok(Self {
            username: username.into(),
            role: role.into(),
            password_hash: hash_password(password)?,
        })
    }

    /// Rebuild a user from an already-computed PHC hash
    pub fn from_hash(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Constant-time check of `password` against the stored hash
    pub fn is_correct_password(&self, password: &str) -> Result<bool> {
        Ok(verify_password(password, &self.password_hash)?)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_hashed() {
        let user = User::new("admin1", "secret", "admin").unwrap();

        assert_ne!(user.password_hash, "secret");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[test]
    fn test_is_correct_password() {
        let user = User::new("admin1", "secret", "admin").unwrap();

        assert!(user.is_correct_password("secret").unwrap());
        assert!(!user.is_correct_password("Secret").unwrap());
        assert!(!user.is_correct_password("").unwrap());
    }

    #[test]
    fn test_debug_redacts_hash() {
        let user = User::new("admin1", "secret", "admin").unwrap();
        let debug = format!("{:?}", user);

        assert!(debug.contains("admin1"));
        assert!(!debug.contains(&user.password_hash));
    }
}
