//! Client-side wrappers over the generated stubs

use crate::grpc::proto::auth_service_client::AuthServiceClient;
use crate::grpc::proto::laptop_service_client::LaptopServiceClient;
use crate::grpc::proto::upload_image_request::Data;
use crate::grpc::proto::*;
use async_trait::async_trait;
use grpc_jwt_propagation::{ClientAuthService, TokenSource};
use tonic::transport::Channel;
use tonic::Status;
use tracing::{debug, info};

/// Bytes per UploadImage chunk message
const IMAGE_CHUNK_SIZE: usize = 1024;

/// Login client used by the token refresher
///
/// Talks to AuthService over its own, undecorated channel.
#[derive(Clone)]
pub struct AuthClient {
    client: AuthServiceClient<Channel>,
    username: String,
    password: String,
}

impl AuthClient {
    pub fn new(channel: Channel, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            client: AuthServiceClient::new(channel),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenSource for AuthClient {
    async fn fetch_token(&self) -> Result<String, Status> {
        let request = LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        };

        let response = self.client.clone().login(request).await?;
        debug!(username = %self.username, "Login succeeded");

        Ok(response.into_inner().access_token)
    }
}

/// Channel decorated with the client call gate
pub type AuthedChannel = ClientAuthService<Channel>;

/// Catalog client whose protected calls carry the current access token
#[derive(Debug, Clone)]
pub struct LaptopClient {
    client: LaptopServiceClient<AuthedChannel>,
}

impl LaptopClient {
    pub fn new(channel: AuthedChannel) -> Self {
        Self {
            client: LaptopServiceClient::new(channel),
        }
    }

    /// Create a laptop, returning its (possibly server-assigned) id
    pub async fn create_laptop(&self, laptop: Laptop) -> Result<String, Status> {
        let response = self
            .client
            .clone()
            .create_laptop(CreateLaptopRequest {
                laptop: Some(laptop),
            })
            .await?;

        let id = response.into_inner().id;
        info!(laptop_id = %id, "Created laptop");
        Ok(id)
    }

    /// Collect every laptop the server streams back for `filter`
    pub async fn search_laptop(&self, filter: Option<Filter>) -> Result<Vec<Laptop>, Status> {
        let mut stream = self
            .client
            .clone()
            .search_laptop(SearchLaptopRequest { filter })
            .await?
            .into_inner();

        let mut found = Vec::new();
        while let Some(response) = stream.message().await? {
            if let Some(laptop) = response.laptop {
                debug!(laptop_id = %laptop.id, "Found laptop");
                found.push(laptop);
            }
        }

        Ok(found)
    }

    /// Upload `data` as an image of `laptop_id`, one info message followed by fixed-size chunks
    pub async fn upload_image(
        &self,
        laptop_id: &str,
        image_type: &str,
        data: &[u8],
    ) -> Result<UploadImageResponse, Status> {
        let info = UploadImageRequest {
            data: Some(Data::Info(ImageInfo {
                laptop_id: laptop_id.to_string(),
                image_type: image_type.to_string(),
            })),
        };
        let requests: Vec<_> = std::iter::once(info)
            .chain(data.chunks(IMAGE_CHUNK_SIZE).map(|chunk| UploadImageRequest {
                data: Some(Data::ChunkData(chunk.to_vec())),
            }))
            .collect();

        let response = self
            .client
            .clone()
            .upload_image(tokio_stream::iter(requests))
            .await?
            .into_inner();

        info!(image_id = %response.id, size = response.size, "Uploaded image");
        Ok(response)
    }

    /// Send one score per laptop over a single bidirectional stream
    pub async fn rate_laptop(
        &self,
        ratings: Vec<(String, f64)>,
    ) -> Result<Vec<RateLaptopResponse>, Status> {
        let requests: Vec<_> = ratings
            .into_iter()
            .map(|(laptop_id, score)| RateLaptopRequest { laptop_id, score })
            .collect();

        let mut stream = self
            .client
            .clone()
            .rate_laptop(tokio_stream::iter(requests))
            .await?
            .into_inner();

        let mut responses = Vec::new();
        while let Some(response) = stream.message().await? {
            info!(
                laptop_id = %response.laptop_id,
                rated_count = response.rated_count,
                average_score = response.average_score,
                "Received rating"
            );
            responses.push(response);
        }

        Ok(responses)
    }
}
