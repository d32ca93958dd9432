//! Client token refresh scheduler
//!
//! Logs in once up front, then keeps the [`TokenSlot`] fresh from a background task.
//!
//! ## Schedule
//!
//! - After a successful login the next attempt waits the full `refresh_interval`.
//! - After a failure the previous token stays in the slot and the next attempt waits
//!   `retry_interval`, doubling on each consecutive failure up to `max_retry_interval`.
//!
//! Refresh failures are never surfaced to callers. In-flight and future calls keep the last
//! good token until the server rejects it.

use crate::client::ClientAuthLayer;
use crate::policy::AuthMethods;
use crate::token_slot::TokenSlot;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tonic::Status;
use tracing::{debug, info, warn};

const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Login capability used by the scheduler
#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    /// Perform one login and return the issued access token
    async fn fetch_token(&self) -> Result<String, Status>;
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("initial login failed: {0}")]
    InitialLogin(#[source] Status),

    #[error("invalid refresh configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Refresh cadence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Wait after a successful login
    pub refresh_interval: Duration,

    /// Wait after the first failed login
    pub retry_interval: Duration,

    /// Upper bound for the wait after repeated failures
    pub max_retry_interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl RefreshConfig {
    /// Config retrying after 1s (or `refresh_interval`, if shorter), backing off up to
    /// `refresh_interval`
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            refresh_interval,
            retry_interval: DEFAULT_RETRY_INTERVAL.min(refresh_interval),
            max_retry_interval: refresh_interval,
        }
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    pub fn with_max_retry_interval(mut self, max_retry_interval: Duration) -> Self {
        self.max_retry_interval = max_retry_interval;
        self
    }

    /// Delay before the next attempt given the number of consecutive failures so far
    pub fn next_delay(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return self.refresh_interval;
        }

        let exponent = (consecutive_failures - 1).min(31);
        self.retry_interval
            .saturating_mul(1u32 << exponent)
            .min(self.max_retry_interval)
    }

    fn validate(&self) -> Result<(), RefreshError> {
        if self.refresh_interval.is_zero() {
            return Err(RefreshError::InvalidConfig("refresh interval must be positive"));
        }
        if self.retry_interval.is_zero() {
            return Err(RefreshError::InvalidConfig("retry interval must be positive"));
        }
        if self.max_retry_interval < self.retry_interval {
            return Err(RefreshError::InvalidConfig(
                "max retry interval must not be shorter than the retry interval",
            ));
        }
        Ok(())
    }
}

/// Handle to a running refresh task
///
/// Dropping the handle stops the task. Prefer [`TokenRefresher::shutdown`] to wait for it
/// to finish.
#[derive(Debug)]
pub struct TokenRefresher {
    slot: TokenSlot,
    shutdown_tx: watch::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl TokenRefresher {
    /// Log in once and start refreshing in the background
    ///
    /// The returned handle's slot already holds a token.
    ///
    /// ## Errors
    ///
    /// - `RefreshError::InvalidConfig` if any interval is zero or the cap is below the
    ///   retry interval
    /// - `RefreshError::InitialLogin` if the first login fails; no task is started
    pub async fn start<S: TokenSource>(
        source: S,
        config: RefreshConfig,
    ) -> Result<Self, RefreshError> {
        config.validate()?;

        let token = source
            .fetch_token()
            .await
            .map_err(RefreshError::InitialLogin)?;
        info!("Initial login succeeded");

        let slot = TokenSlot::new(token);
        let (shutdown_tx, shutdown_rx) = watch::channel(());

        let handle = tokio::spawn(refresh_loop(source, slot.clone(), config, shutdown_rx));

        Ok(Self {
            slot,
            shutdown_tx,
            handle: Some(handle),
        })
    }

    pub fn slot(&self) -> TokenSlot {
        self.slot.clone()
    }

    /// Client call gate reading from this refresher's slot
    pub fn layer(&self, methods: AuthMethods) -> ClientAuthLayer {
        ClientAuthLayer::new(self.slot(), methods)
    }

    /// Stop the refresh task and wait for it to exit
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(());

        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "Token refresh task ended abnormally");
            }
        }
    }
}

impl Drop for TokenRefresher {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn refresh_loop<S: TokenSource>(
    source: S,
    slot: TokenSlot,
    config: RefreshConfig,
    mut shutdown: watch::Receiver<()>,
) {
    let mut failures: u32 = 0;

    loop {
        let wait = config.next_delay(failures);
        debug!(wait_ms = wait.as_millis() as u64, "Next token refresh scheduled");

        tokio::select! {
            _ = shutdown.changed() => {
                info!("Token refresher shutting down");
                break;
            }
            _ = sleep(wait) => {}
        }

        let result = tokio::select! {
            _ = shutdown.changed() => {
                info!("Token refresher shutting down");
                break;
            }
            result = source.fetch_token() => result,
        };

        match result {
            Ok(token) => {
                slot.replace(token);
                failures = 0;
                info!("Access token refreshed");
            }
            Err(status) => {
                failures = failures.saturating_add(1);
                warn!(
                    code = ?status.code(),
                    message = status.message(),
                    consecutive_failures = failures,
                    "Token refresh failed, keeping previous token"
                );
            }
        }
    }
}
