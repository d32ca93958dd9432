//! Token propagation and role-based access control for gRPC
//!
//! Carries access tokens from a calling process to a serving process in the `authorization`
//! metadata entry and enforces a per-method role table on the serving side.
//!
//! ## Core Components
//!
//! - **AccessPolicy / AuthMethods**: method path to allowed roles (server), and the set of
//!   methods that need a token attached (client)
//! - **ServerAuthLayer**: tower layer that verifies tokens and checks roles before any handler runs
//! - **JwtClaimsExt**: request extension trait for reading the verified claims in a handler
//! - **TokenSlot**: the client's current token, shared between the refresher and in-flight calls
//! - **TokenRefresher**: logs in once, then keeps the slot fresh in the background
//! - **ClientAuthLayer**: tower layer that attaches the current token to protected calls
//!
//! ## Usage Example
//!
//! ### Server Side
//!
//! ```rust,no_run
//! use crypto_core::jwt::TokenCodec;
//! use grpc_jwt_propagation::{AccessPolicy, AuthGate, ServerAuthLayer};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = Arc::new(TokenCodec::new("secret", chrono::Duration::minutes(15))?);
//! let policy = AccessPolicy::builder()
//!     .allow("/pcbook.LaptopService/CreateLaptop", ["admin"])
//!     .allow("/pcbook.LaptopService/RateLaptop", ["admin", "user"])
//!     .build();
//!
//! let layer = ServerAuthLayer::new(AuthGate::new(codec, policy));
//! // tonic::transport::Server::builder().layer(layer).add_service(...)
//! # Ok(())
//! # }
//! ```
//!
//! ### Client Side
//!
//! ```rust,no_run
//! use grpc_jwt_propagation::{AuthMethods, RefreshConfig, TokenRefresher, TokenSource};
//! use tower::Layer;
//!
//! # async fn example(source: impl TokenSource) -> Result<(), Box<dyn std::error::Error>> {
//! let refresher = TokenRefresher::start(source, RefreshConfig::default()).await?;
//!
//! let channel = tonic::transport::Channel::from_static("http://127.0.0.1:50051")
//!     .connect()
//!     .await?;
//! let methods = AuthMethods::new(["/pcbook.LaptopService/CreateLaptop"]);
//! let channel = refresher.layer(methods).layer(channel);
//! // let client = LaptopServiceClient::new(channel);
//!
//! refresher.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Wire Contract
//!
//! - Metadata key `authorization`, value is the raw token with no scheme prefix
//! - No token on a protected method = `Status::unauthenticated`
//! - Invalid or expired token = `Status::unauthenticated`
//! - Role not allowed = `Status::permission_denied`

mod claims;
mod client;
mod extensions;
mod policy;
mod refresh;
mod server;
mod token_slot;

pub use claims::JwtClaims;
pub use client::{ClientAuthLayer, ClientAuthService};
pub use extensions::JwtClaimsExt;
pub use policy::{AccessPolicy, AccessPolicyBuilder, AuthMethods};
pub use refresh::{RefreshConfig, RefreshError, TokenRefresher, TokenSource};
pub use server::{AuthGate, ServerAuthLayer, ServerAuthService};
pub use token_slot::TokenSlot;

// Re-export tonic Status for convenience
pub use tonic::Status;

/// Metadata key carrying the access token
pub const AUTHORIZATION_KEY: &str = "authorization";
