/// LaptopService implementation
///
/// Implements:
/// - CreateLaptop (unary)
/// - SearchLaptop (server streaming)
/// - UploadImage (client streaming)
/// - RateLaptop (bidirectional streaming)
///
/// Access control happens before these handlers run; UploadImage and RateLaptop read the
/// verified caller from request extensions for their logs.
use crate::db::{
    ImageStore, InMemoryImageStore, InMemoryLaptopStore, InMemoryRatingStore, LaptopStore,
    RatingStore,
};
use crate::error::ServiceError;
use crate::grpc::proto::laptop_service_server::LaptopService;
use crate::grpc::proto::upload_image_request::Data;
use crate::grpc::proto::*;
use crate::models::{Image, LaptopFilter};
use grpc_jwt_propagation::JwtClaimsExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info, warn};
use uuid::Uuid;

const RATE_CHANNEL_CAPACITY: usize = 16;

/// Largest accepted image, 1 MiB
pub const MAX_IMAGE_SIZE: usize = 1 << 20;

#[derive(Clone)]
pub struct LaptopServer {
    laptops: Arc<dyn LaptopStore>,
    ratings: Arc<dyn RatingStore>,
    images: Arc<dyn ImageStore>,
}

impl LaptopServer {
    pub fn new(
        laptops: Arc<dyn LaptopStore>,
        ratings: Arc<dyn RatingStore>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            laptops,
            ratings,
            images,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryLaptopStore::new()),
            Arc::new(InMemoryRatingStore::new()),
            Arc::new(InMemoryImageStore::new()),
        )
    }
}

/// Read an image upload: one info message naming an existing laptop, then data chunks
///
/// ## Errors
///
/// - `InvalidArgument` if the first message is not info, a later one is not a chunk, or the
///   total exceeds `max_size`
/// - `NotFound` if the laptop does not exist
async fn receive_image<S>(
    laptops: &dyn LaptopStore,
    mut inbound: S,
    max_size: usize,
) -> Result<Image, Status>
where
    S: Stream<Item = Result<UploadImageRequest, Status>> + Unpin,
{
    let info = match inbound.next().await.transpose()? {
        Some(UploadImageRequest {
            data: Some(Data::Info(info)),
        }) => info,
        _ => return Err(Status::invalid_argument("first message must carry image info")),
    };

    if laptops.find(&info.laptop_id).await?.is_none() {
        return Err(ServiceError::LaptopNotFound(info.laptop_id).into());
    }

    let mut data = Vec::new();
    while let Some(req) = inbound.next().await.transpose()? {
        let chunk = match req.data {
            Some(Data::ChunkData(chunk)) => chunk,
            _ => return Err(Status::invalid_argument("expected image chunk data")),
        };

        let size = data.len() + chunk.len();
        if size > max_size {
            return Err(ServiceError::ImageTooLarge {
                size,
                max: max_size,
            }
            .into());
        }

        debug!(chunk_size = chunk.len(), "Received image chunk");
        data.extend_from_slice(&chunk);
    }

    Ok(Image {
        laptop_id: info.laptop_id,
        image_type: info.image_type,
        data,
    })
}

async fn rate_one(
    laptops: &dyn LaptopStore,
    ratings: &dyn RatingStore,
    req: RateLaptopRequest,
) -> Result<RateLaptopResponse, Status> {
    if laptops.find(&req.laptop_id).await?.is_none() {
        return Err(ServiceError::LaptopNotFound(req.laptop_id).into());
    }

    let rating = ratings.add(&req.laptop_id, req.score).await?;

    Ok(RateLaptopResponse {
        laptop_id: req.laptop_id,
        rated_count: rating.count,
        average_score: rating.average(),
    })
}

#[tonic::async_trait]
impl LaptopService for LaptopServer {
    async fn create_laptop(
        &self,
        request: Request<CreateLaptopRequest>,
    ) -> std::result::Result<Response<CreateLaptopResponse>, Status> {
        let mut laptop = request
            .into_inner()
            .laptop
            .ok_or_else(|| Status::invalid_argument("laptop is required"))?;

        if laptop.id.is_empty() {
            laptop.id = Uuid::new_v4().to_string();
        } else if let Err(e) = Uuid::parse_str(&laptop.id) {
            return Err(ServiceError::InvalidArgument(format!(
                "laptop ID is not a valid UUID: {}",
                e
            ))
            .into());
        }

        let id = laptop.id.clone();
        self.laptops.save(laptop).await?;
        info!(laptop_id = %id, "Saved laptop");

        Ok(Response::new(CreateLaptopResponse { id }))
    }

    type SearchLaptopStream =
        tokio_stream::Iter<std::vec::IntoIter<std::result::Result<SearchLaptopResponse, Status>>>;

    async fn search_laptop(
        &self,
        request: Request<SearchLaptopRequest>,
    ) -> std::result::Result<Response<Self::SearchLaptopStream>, Status> {
        let filter = LaptopFilter::from(request.into_inner().filter);
        debug!(?filter, "Received search-laptop request");

        let found: Vec<_> = self
            .laptops
            .search(&filter)
            .await?
            .into_iter()
            .map(|laptop| {
                Ok(SearchLaptopResponse {
                    laptop: Some(laptop),
                })
            })
            .collect();

        info!(matches = found.len(), "Streaming search results");
        Ok(Response::new(tokio_stream::iter(found)))
    }

    async fn upload_image(
        &self,
        request: Request<Streaming<UploadImageRequest>>,
    ) -> std::result::Result<Response<UploadImageResponse>, Status> {
        let uploader = request.jwt_claims()?.username.clone();
        let image = receive_image(self.laptops.as_ref(), request.into_inner(), MAX_IMAGE_SIZE)
            .await
            .map_err(|status| {
                warn!(uploader = %uploader, error = %status, "Rejected image upload");
                status
            })?;

        let laptop_id = image.laptop_id.clone();
        // Bounded by MAX_IMAGE_SIZE
        let size = image.size() as u32;
        let id = self.images.save(image).await?;
        info!(uploader = %uploader, laptop_id = %laptop_id, image_id = %id, size, "Saved image");

        Ok(Response::new(UploadImageResponse { id, size }))
    }

    type RateLaptopStream = ReceiverStream<std::result::Result<RateLaptopResponse, Status>>;

    async fn rate_laptop(
        &self,
        request: Request<Streaming<RateLaptopRequest>>,
    ) -> std::result::Result<Response<Self::RateLaptopStream>, Status> {
        let rater = request.jwt_claims()?.username.clone();
        let mut inbound = request.into_inner();

        let (tx, rx) = mpsc::channel(RATE_CHANNEL_CAPACITY);
        let laptops = self.laptops.clone();
        let ratings = self.ratings.clone();

        tokio::spawn(async move {
            loop {
                let req = match inbound.message().await {
                    Ok(Some(req)) => req,
                    Ok(None) => break,
                    Err(status) => {
                        warn!(error = %status, "Failed to receive rating");
                        break;
                    }
                };

                debug!(
                    rater = %rater,
                    laptop_id = %req.laptop_id,
                    score = req.score,
                    "Received rating"
                );

                let result = rate_one(laptops.as_ref(), ratings.as_ref(), req).await;
                // An error ends the stream after it is delivered
                let failed = result.is_err();

                if tx.send(result).await.is_err() || failed {
                    break;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
