//! Request Extension Trait for JWT Claims Access
//!
//! Provides ergonomic helpers for reading the claims the server gate stored on a request.

use crate::JwtClaims;
use tonic::{Request, Status};

/// Extension trait for accessing verified claims from gRPC requests
///
/// Claims are present only on calls to protected methods; public methods are never
/// inspected by the gate, so `jwt_claims()` fails on them.
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_propagation::JwtClaimsExt;
/// use tonic::{Request, Response, Status};
///
/// async fn rate_laptop(request: Request<()>) -> Result<Response<()>, Status> {
///     let claims = request.jwt_claims()?;
///     tracing::info!(username = %claims.username, "Rating received");
///     Ok(Response::new(()))
/// }
/// ```
pub trait JwtClaimsExt {
    /// Extract verified claims from request extensions
    ///
    /// ## Errors
    ///
    /// Returns `Status::unauthenticated` if the server gate did not store claims, either
    /// because it is not installed or because the method is public.
    fn jwt_claims(&self) -> Result<&JwtClaims, Status>;
}

impl<T> JwtClaimsExt for Request<T> {
    fn jwt_claims(&self) -> Result<&JwtClaims, Status> {
        self.extensions().get::<JwtClaims>().ok_or_else(|| {
            Status::unauthenticated("No JWT claims found. Ensure ServerAuthLayer is installed.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(role: &str) -> Request<()> {
        let mut request = Request::new(());
        request.extensions_mut().insert(JwtClaims {
            username: "testuser".to_string(),
            role: role.to_string(),
            exp: 0,
        });
        request
    }

    #[test]
    fn test_jwt_claims_missing() {
        let request = Request::new(());
        let status = request.jwt_claims().unwrap_err();

        assert_eq!(status.code(), tonic::Code::Unauthenticated);
        assert!(status.message().contains("No JWT claims found"));
    }

    #[test]
    fn test_jwt_claims_present() {
        let request = request_with("user");
        let claims = request.jwt_claims().unwrap();

        assert_eq!(claims.username, "testuser");
        assert_eq!(claims.role, "user");
    }
}
