//! Client-side call gate
//!
//! Attaches the current access token to outgoing calls whose method requires it.

use crate::policy::AuthMethods;
use crate::token_slot::TokenSlot;
use crate::AUTHORIZATION_KEY;
use http::HeaderValue;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Tower layer that decorates a channel with token attachment
///
/// The token is read from the [`TokenSlot`] at call time, so a refresh that lands between
/// two calls is picked up by the second one without rebuilding the client. Methods not in
/// [`AuthMethods`] are forwarded untouched.
///
/// The raw token is sent as the `authorization` value with no scheme prefix.
///
/// ## Usage
///
/// ```rust,no_run
/// use grpc_jwt_propagation::{AuthMethods, ClientAuthLayer, TokenSlot};
/// use tower::Layer;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let channel = tonic::transport::Channel::from_static("http://127.0.0.1:50051")
///     .connect()
///     .await?;
///
/// let slot = TokenSlot::new("eyJhbGc...");
/// let methods = AuthMethods::new(["/pcbook.LaptopService/CreateLaptop"]);
/// let channel = ClientAuthLayer::new(slot, methods).layer(channel);
/// // let client = LaptopServiceClient::new(channel);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientAuthLayer {
    slot: TokenSlot,
    methods: Arc<AuthMethods>,
}

impl ClientAuthLayer {
    pub fn new(slot: TokenSlot, methods: AuthMethods) -> Self {
        Self {
            slot,
            methods: Arc::new(methods),
        }
    }
}

impl<S> Layer<S> for ClientAuthLayer {
    type Service = ClientAuthService<S>;

    fn layer(&self, service: S) -> Self::Service {
        ClientAuthService {
            inner: service,
            slot: self.slot.clone(),
            methods: self.methods.clone(),
        }
    }
}

/// Tower service produced by [`ClientAuthLayer`]
#[derive(Debug, Clone)]
pub struct ClientAuthService<S> {
    inner: S,
    slot: TokenSlot,
    methods: Arc<AuthMethods>,
}

impl<S, B> Service<http::Request<B>> for ClientAuthService<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<B>) -> Self::Future {
        if self.methods.requires_auth(req.uri().path()) {
            let token = self.slot.current();

            match HeaderValue::from_str(&token) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    req.headers_mut().insert(AUTHORIZATION_KEY, value);
                    debug!(method = req.uri().path(), "Attached access token");
                }
                // Forwarded without a token; the server answers Unauthenticated
                Err(_) => warn!(
                    method = req.uri().path(),
                    "Access token is not a valid header value"
                ),
            }
        }

        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::{ready, Ready};
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    const CREATE: &str = "/pcbook.LaptopService/CreateLaptop";
    const SEARCH: &str = "/pcbook.LaptopService/SearchLaptop";

    /// Echoes the authorization header back as the response
    fn echo(req: http::Request<()>) -> Ready<Result<Option<String>, Infallible>> {
        ready(Ok(req
            .headers()
            .get(AUTHORIZATION_KEY)
            .map(|v| v.to_str().unwrap().to_string())))
    }

    fn request(path: &str) -> http::Request<()> {
        http::Request::builder()
            .uri(format!("http://127.0.0.1:50051{path}"))
            .body(())
            .unwrap()
    }

    fn layer(slot: &TokenSlot) -> ClientAuthLayer {
        ClientAuthLayer::new(slot.clone(), AuthMethods::new([CREATE]))
    }

    #[tokio::test]
    async fn test_attaches_raw_token_to_protected_method() {
        let slot = TokenSlot::new("token-1");
        let service = layer(&slot).layer(service_fn(echo));

        let header = service.oneshot(request(CREATE)).await.unwrap();
        assert_eq!(header.as_deref(), Some("token-1"));
    }

    #[tokio::test]
    async fn test_public_method_left_untouched() {
        let slot = TokenSlot::new("token-1");
        let service = layer(&slot).layer(service_fn(echo));

        let header = service.oneshot(request(SEARCH)).await.unwrap();
        assert_eq!(header, None);
    }

    #[tokio::test]
    async fn test_reads_slot_at_call_time() {
        let slot = TokenSlot::new("token-1");
        let service = layer(&slot).layer(service_fn(echo));

        let first = service.clone().oneshot(request(CREATE)).await.unwrap();
        slot.replace("token-2");
        let second = service.oneshot(request(CREATE)).await.unwrap();

        assert_eq!(first.as_deref(), Some("token-1"));
        assert_eq!(second.as_deref(), Some("token-2"));
    }

    #[tokio::test]
    async fn test_overwrites_existing_authorization() {
        let slot = TokenSlot::new("token-1");
        let service = layer(&slot).layer(service_fn(echo));

        let mut req = request(CREATE);
        req.headers_mut()
            .insert(AUTHORIZATION_KEY, HeaderValue::from_static("stale"));

        let header = service.oneshot(req).await.unwrap();
        assert_eq!(header.as_deref(), Some("token-1"));
    }
}
