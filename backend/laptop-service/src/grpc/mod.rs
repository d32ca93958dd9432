/// gRPC surface of laptop-service
///
/// Exports:
/// - proto: wire messages and generated AuthService / LaptopService stubs
/// - AuthServer, LaptopServer: service implementations
/// - AuthClient, LaptopClient: client wrappers
/// - serve: runs both services behind the server call gate
pub mod auth_server;
pub mod client;
pub mod laptop_server;
pub mod proto;

pub use auth_server::AuthServer;
pub use client::{AuthClient, AuthedChannel, LaptopClient};
pub use laptop_server::LaptopServer;

use crate::db::UserStore;
use crate::policy::accessible_roles;
use crate::services::TokenIssuer;
use crypto_core::jwt::TokenCodec;
use grpc_jwt_propagation::{AuthGate, ServerAuthLayer};
use proto::auth_service_server::AuthServiceServer;
use proto::laptop_service_server::LaptopServiceServer;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

/// Serve AuthService, LaptopService and the health service on `listener` until
/// `shutdown` resolves
///
/// Every inbound call, unary or streaming, passes the server call gate first.
pub async fn serve<F>(
    listener: TcpListener,
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()>,
{
    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<AuthServiceServer<AuthServer>>()
        .await;
    health_reporter
        .set_serving::<LaptopServiceServer<LaptopServer>>()
        .await;

    let issuer = TokenIssuer::new(users, codec.clone());
    let gate = ServerAuthLayer::new(AuthGate::new(codec, accessible_roles()));
    info!(
        protected_methods = gate.gate().policy().len(),
        "Access policy loaded"
    );

    Server::builder()
        .layer(gate)
        .add_service(health_service)
        .add_service(AuthServiceServer::new(AuthServer::new(issuer)))
        .add_service(LaptopServiceServer::new(LaptopServer::in_memory()))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}
