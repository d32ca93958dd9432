/// Login: credential check and access token issuance
use crate::db::UserStore;
use crate::error::{Result, ServiceError};
use crypto_core::jwt::TokenCodec;
use crypto_core::verify_password;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, info};

/// Hash verified for unknown usernames, so both failure causes cost one Argon2 run
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| crypto_core::hash_password("timing-equalizer").ok());

#[derive(Clone)]
pub struct TokenIssuer {
    users: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
}

impl TokenIssuer {
    pub fn new(users: Arc<dyn UserStore>, codec: Arc<TokenCodec>) -> Self {
        Self { users, codec }
    }

    /// Exchange a username and password for a signed access token
    ///
    /// ## Errors
    ///
    /// - `ServiceError::InvalidCredentials` for an unknown user or a wrong password, with no
    ///   way for the caller to tell which
    /// - `ServiceError::Signing` if the token cannot be produced
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let Some(user) = self.users.find(username).await? else {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, hash);
            }
            debug!(username, "Login rejected");
            return Err(ServiceError::InvalidCredentials);
        };

        if !user.is_correct_password(password)? {
            debug!(username, "Login rejected");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.codec.sign(&user.username, &user.role)?;
        info!(username = %user.username, role = %user.role, "Access token issued");

        Ok(token)
    }
}
