/// AuthService implementation: the login RPC
use crate::grpc::proto::auth_service_server::AuthService;
use crate::grpc::proto::{LoginRequest, LoginResponse};
use crate::services::TokenIssuer;
use tonic::{Request, Response, Status};

#[derive(Clone)]
pub struct AuthServer {
    issuer: TokenIssuer,
}

impl AuthServer {
    pub fn new(issuer: TokenIssuer) -> Self {
        Self { issuer }
    }
}

#[tonic::async_trait]
impl AuthService for AuthServer {
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> std::result::Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        let access_token = self.issuer.login(&req.username, &req.password).await?;

        Ok(Response::new(LoginResponse { access_token }))
    }
}
