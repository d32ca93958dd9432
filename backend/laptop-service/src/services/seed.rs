/// Startup credential seeding
use crate::db::UserStore;
use crate::error::{Result, ServiceError};
use crate::models::User;
use tracing::info;

pub const DEFAULT_SEED_USERS: &str = "admin1:secret:admin,user1:secret:user";

#[derive(Clone, PartialEq, Eq)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl std::fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUser")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Parse `username:password:role` entries separated by commas
///
/// Passwords may not contain `:` or `,`. Blank entries are skipped.
pub fn parse_seed_users(spec: &str) -> Result<Vec<SeedUser>> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.split(':').collect();
            match parts.as_slice() {
                [username, password, role]
                    if !username.is_empty() && !password.is_empty() && !role.is_empty() =>
                {
                    Ok(SeedUser {
                        username: username.to_string(),
                        password: password.to_string(),
                        role: role.to_string(),
                    })
                }
                _ => Err(ServiceError::InvalidArgument(format!(
                    "seed entry must be username:password:role, got {} field(s)",
                    parts.len()
                ))),
            }
        })
        .collect()
}

/// Hash and store every seed user
pub async fn seed_users(store: &dyn UserStore, users: &[SeedUser]) -> Result<()> {
    for seed in users {
        let user = User::new(seed.username.as_str(), &seed.password, seed.role.as_str())?;
        store.save(user).await?;
        info!(username = %seed.username, role = %seed.role, "Seeded user");
    }
    Ok(())
}
