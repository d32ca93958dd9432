//! Server-side call gate
//!
//! Enforces the [`AccessPolicy`] on every inbound call before it reaches a handler.
//! The gate runs as a tower layer on the whole tonic server rather than as a tonic
//! `Interceptor`, because only the HTTP request carries the full method path, and so
//! unary and streaming calls pass through the same check.

use crate::claims::JwtClaims;
use crate::policy::AccessPolicy;
use crate::AUTHORIZATION_KEY;
use crypto_core::jwt::TokenCodec;
use futures_util::future::{ready, Either, Ready};
use http::{header::CONTENT_TYPE, HeaderMap, HeaderValue};
use std::sync::Arc;
use std::task::{Context, Poll};
use tonic::Status;
use tower::{Layer, Service};
use tracing::{debug, error, warn};

/// Authorization decision for one call
///
/// Only reads the immutable policy and the stateless codec, so a single instance is
/// shared by every in-flight call without locking.
#[derive(Debug)]
pub struct AuthGate {
    codec: Arc<TokenCodec>,
    policy: AccessPolicy,
}

impl AuthGate {
    pub fn new(codec: Arc<TokenCodec>, policy: AccessPolicy) -> Self {
        Self { codec, policy }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Decide whether a call to `method` carrying `headers` may proceed
    ///
    /// ## Returns
    ///
    /// - `Ok(None)` for public methods; metadata is not inspected
    /// - `Ok(Some(claims))` for protected methods called with an authorized token
    ///
    /// ## Errors
    ///
    /// - `Status::unauthenticated` if the token is missing, empty or fails verification
    /// - `Status::permission_denied` if the verified role is not allowed on `method`
    pub fn authorize(&self, method: &str, headers: &HeaderMap) -> Result<Option<JwtClaims>, Status> {
        let Some(allowed_roles) = self.policy.required_roles(method) else {
            debug!(method, "Public method, skipping authorization");
            return Ok(None);
        };

        let token = extract_token(headers).map_err(|status| {
            warn!(method, reason = status.message(), "Rejected call without access token");
            status
        })?;

        let claims = self.codec.verify(token).map_err(|e| {
            if e.is_invalid_token() {
                warn!(method, error = %e, "Access token verification failed");
            } else {
                error!(method, error = %e, "Access token could not be checked");
            }
            Status::unauthenticated(format!("access token is invalid: {e}"))
        })?;

        let claims = JwtClaims::from_validated_claims(&claims);

        if !claims.has_any_role(allowed_roles) {
            warn!(
                method,
                username = %claims.username,
                role = %claims.role,
                "Role not permitted for method"
            );
            return Err(Status::permission_denied("no permission to access this RPC"));
        }

        debug!(
            method,
            username = %claims.username,
            expires_at = ?claims.expires_at(),
            "Call authorized"
        );
        Ok(Some(claims))
    }
}

/// Raw token from the `authorization` metadata entry (no scheme prefix)
fn extract_token(headers: &HeaderMap) -> Result<&str, Status> {
    let value = headers
        .get(AUTHORIZATION_KEY)
        .ok_or_else(|| Status::unauthenticated("authorization token is not provided"))?;

    let token = value
        .to_str()
        .map_err(|_| Status::unauthenticated("authorization token is not valid ASCII"))?;

    if token.is_empty() {
        return Err(Status::unauthenticated("authorization token is not provided"));
    }

    Ok(token)
}

/// Tower layer installing the server call gate
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_propagation::{AccessPolicy, AuthGate, ServerAuthLayer};
/// use std::sync::Arc;
///
/// # fn example(codec: Arc<crypto_core::jwt::TokenCodec>) {
/// let policy = AccessPolicy::builder()
///     .allow("/pcbook.LaptopService/CreateLaptop", ["admin"])
///     .build();
/// let layer = ServerAuthLayer::new(AuthGate::new(codec, policy));
/// // tonic::transport::Server::builder().layer(layer).add_service(...)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ServerAuthLayer {
    gate: Arc<AuthGate>,
}

impl ServerAuthLayer {
    pub fn new(gate: AuthGate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }
}

impl<S> Layer<S> for ServerAuthLayer {
    type Service = ServerAuthService<S>;

    fn layer(&self, service: S) -> Self::Service {
        ServerAuthService {
            inner: service,
            gate: self.gate.clone(),
        }
    }
}

/// Tower service produced by [`ServerAuthLayer`]
#[derive(Debug, Clone)]
pub struct ServerAuthService<S> {
    inner: S,
    gate: Arc<AuthGate>,
}

impl<S, ReqBody, ResBody> Service<http::Request<ReqBody>> for ServerAuthService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<ResBody>>,
    ResBody: Default,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Either<Ready<Result<Self::Response, Self::Error>>, S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<ReqBody>) -> Self::Future {
        match self.gate.authorize(req.uri().path(), req.headers()) {
            Ok(Some(claims)) => {
                // Handlers read these through JwtClaimsExt
                req.extensions_mut().insert(claims);
                Either::Right(self.inner.call(req))
            }
            Ok(None) => Either::Right(self.inner.call(req)),
            Err(status) => Either::Left(ready(Ok(status_response(status)))),
        }
    }
}

/// Trailers-only gRPC response carrying `status`
fn status_response<B: Default>(status: Status) -> http::Response<B> {
    let mut response = http::Response::new(B::default());
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/grpc"));

    if let Err(err) = status.add_header(response.headers_mut()) {
        warn!(error = %err, "Failed to encode gRPC status headers");
    }

    response
}
