/// Laptop Service Main Entry Point
///
/// Starts gRPC server with:
/// - In-memory credential store seeded from configuration
/// - HS256 token codec for login and the server call gate
/// - AuthService, LaptopService and the standard health service
use anyhow::{Context, Result};
use crypto_core::jwt::TokenCodec;
use laptop_service::{
    config::ServerSettings,
    db::{InMemoryUserStore, UserStore},
    grpc,
    services::seed_users,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "laptop_service=info,info".into()),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting Laptop Service");

    // Load configuration
    let settings = ServerSettings::load().context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    let codec = Arc::new(
        TokenCodec::new(&settings.jwt_secret, settings.token_duration)
            .context("Failed to initialize token codec")?,
    );
    info!(
        token_duration_secs = codec.token_duration().num_seconds(),
        "Token codec initialized"
    );

    let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    seed_users(users.as_ref(), &settings.seed_users)
        .await
        .context("Failed to seed users")?;

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Starting gRPC server on {}", listener.local_addr()?);

    grpc::serve(listener, codec, users, shutdown_signal())
        .await
        .context("gRPC server error")?;

    info!("Laptop service shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
