//! Configuration management for laptop-service
//!
//! Loads settings from environment variables, with a `.env` file honored in
//! debug builds.
//!
//! # Example
//!
//! ```no_run
//! use laptop_service::config::ServerSettings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = ServerSettings::load()?;
//!     println!("Listening on {}:{}", settings.host, settings.port);
//!     Ok(())
//! }
//! ```

use crate::services::{parse_seed_users, seed::DEFAULT_SEED_USERS, SeedUser};
use anyhow::{Context, Result};
use grpc_jwt_propagation::RefreshConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

const MIN_SECRET_LEN: usize = 32;

fn load_dotenv() {
    if cfg!(debug_assertions) {
        dotenvy::dotenv().ok();
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Server settings
#[derive(Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_duration: chrono::Duration,
    pub seed_users: Vec<SeedUser>,
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_duration", &self.token_duration)
            .field("seed_users", &self.seed_users)
            .finish()
    }
}

impl ServerSettings {
    pub fn load() -> Result<Self> {
        load_dotenv();
        Self::from_env()
    }

    fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        if jwt_secret.len() < MIN_SECRET_LEN {
            warn!(
                "JWT_SECRET is shorter than {} bytes; use a longer secret outside development",
                MIN_SECRET_LEN
            );
        }

        let token_duration_secs: i64 = var_or("TOKEN_DURATION_SECS", "900")
            .parse()
            .context("Invalid TOKEN_DURATION_SECS")?;

        let seed_users = parse_seed_users(&var_or("SEED_USERS", DEFAULT_SEED_USERS))
            .context("Invalid SEED_USERS")?;

        Ok(Self {
            host: var_or("SERVER_HOST", "0.0.0.0"),
            port: var_or("SERVER_PORT", "50051")
                .parse()
                .context("Invalid SERVER_PORT")?,
            jwt_secret,
            token_duration: chrono::Duration::try_seconds(token_duration_secs)
                .context("Invalid TOKEN_DURATION_SECS")?,
            seed_users,
        })
    }
}

/// Client settings
#[derive(Clone)]
pub struct ClientSettings {
    pub server_addr: String,
    pub username: String,
    pub password: String,
    pub refresh: RefreshConfig,
    /// Image uploaded for the first created laptop, if set
    pub image_path: Option<PathBuf>,
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("server_addr", &self.server_addr)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("refresh", &self.refresh)
            .field("image_path", &self.image_path)
            .finish()
    }
}

impl ClientSettings {
    pub fn load() -> Result<Self> {
        load_dotenv();
        Self::from_env()
    }

    fn from_env() -> Result<Self> {
        let refresh_interval: u64 = var_or("REFRESH_INTERVAL_SECS", "30")
            .parse()
            .context("Invalid REFRESH_INTERVAL_SECS")?;
        let retry_interval: u64 = var_or("RETRY_INTERVAL_SECS", "1")
            .parse()
            .context("Invalid RETRY_INTERVAL_SECS")?;
        let max_retry_interval: u64 = match env::var("MAX_RETRY_INTERVAL_SECS") {
            Ok(value) => value.parse().context("Invalid MAX_RETRY_INTERVAL_SECS")?,
            Err(_) => refresh_interval,
        };

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "http://127.0.0.1:50051"),
            username: var_or("AUTH_USERNAME", "admin1"),
            password: var_or("AUTH_PASSWORD", "secret"),
            refresh: RefreshConfig::new(Duration::from_secs(refresh_interval))
                .with_retry_interval(Duration::from_secs(retry_interval))
                .with_max_retry_interval(Duration::from_secs(max_retry_interval)),
            image_path: env::var_os("IMAGE_PATH").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below mutate process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const SERVER_VARS: &[&str] = &[
        "SERVER_HOST",
        "SERVER_PORT",
        "JWT_SECRET",
        "TOKEN_DURATION_SECS",
        "SEED_USERS",
    ];
    const CLIENT_VARS: &[&str] = &[
        "SERVER_ADDR",
        "AUTH_USERNAME",
        "AUTH_PASSWORD",
        "REFRESH_INTERVAL_SECS",
        "RETRY_INTERVAL_SECS",
        "MAX_RETRY_INTERVAL_SECS",
        "IMAGE_PATH",
    ];

    fn clear(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear(SERVER_VARS);
        env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");

        let settings = ServerSettings::from_env().unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 50051);
        assert_eq!(settings.token_duration, chrono::Duration::minutes(15));
        assert_eq!(settings.seed_users.len(), 2);
        assert!(!format!("{:?}", settings).contains("0123456789abcdef"));

        clear(SERVER_VARS);
    }

    #[test]
    fn test_server_requires_secret() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear(SERVER_VARS);

        assert!(ServerSettings::from_env().is_err());

        env::set_var("JWT_SECRET", "");
        assert!(ServerSettings::from_env().is_err());

        clear(SERVER_VARS);
    }

    #[test]
    fn test_server_rejects_bad_port() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear(SERVER_VARS);
        env::set_var("JWT_SECRET", "secret");
        env::set_var("SERVER_PORT", "not-a-port");

        assert!(ServerSettings::from_env().is_err());

        clear(SERVER_VARS);
    }

    #[test]
    fn test_server_rejects_out_of_range_token_duration() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear(SERVER_VARS);
        env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        env::set_var("TOKEN_DURATION_SECS", i64::MAX.to_string());

        assert!(ServerSettings::from_env().is_err());

        clear(SERVER_VARS);
    }

    #[test]
    fn test_client_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear(CLIENT_VARS);

        let settings = ClientSettings::from_env().unwrap();

        assert_eq!(settings.server_addr, "http://127.0.0.1:50051");
        assert_eq!(settings.username, "admin1");
        assert_eq!(settings.refresh, RefreshConfig::default());
        assert!(settings.image_path.is_none());
        assert!(!format!("{:?}", settings).contains("secret"));
    }

    #[test]
    fn test_client_max_retry_follows_refresh_interval() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear(CLIENT_VARS);
        env::set_var("REFRESH_INTERVAL_SECS", "60");

        let settings = ClientSettings::from_env().unwrap();

        assert_eq!(settings.refresh.refresh_interval, Duration::from_secs(60));
        assert_eq!(settings.refresh.max_retry_interval, Duration::from_secs(60));
        assert_eq!(settings.refresh.retry_interval, Duration::from_secs(1));

        clear(CLIENT_VARS);
    }

    #[test]
    fn test_client_image_path() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear(CLIENT_VARS);
        env::set_var("IMAGE_PATH", "tmp/laptop.jpg");

        let settings = ClientSettings::from_env().unwrap();

        assert_eq!(settings.image_path, Some(PathBuf::from("tmp/laptop.jpg")));

        clear(CLIENT_VARS);
    }
}
