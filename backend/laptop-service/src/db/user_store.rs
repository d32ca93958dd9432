//! Credential store

use crate::error::{Result, ServiceError};
use crate::models::User;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Username-keyed credential storage
///
/// At most one user exists per username. Lookups hand back an owned copy, so callers
/// cannot mutate stored state.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user
    ///
    /// ## Errors
    ///
    /// `ServiceError::UsernameAlreadyExists` if the username is taken; the stored user is
    /// left untouched.
    async fn save(&self, user: User) -> Result<()>;

    async fn find(&self, username: &str) -> Result<Option<User>>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.username) {
            return Err(ServiceError::UsernameAlreadyExists(user.username));
        }

        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn find(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
