//! Uploaded laptop images

use crate::error::Result;
use crate::models::Image;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `image` under a fresh id and return that id
    async fn save(&self, image: Image) -> Result<String>;

    async fn find(&self, id: &str) -> Result<Option<Image>>;
}

#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    images: RwLock<HashMap<String, Image>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save(&self, image: Image) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.images.write().await.insert(id.clone(), image);
        Ok(id)
    }

    async fn find(&self, id: &str) -> Result<Option<Image>> {
        Ok(self.images.read().await.get(id).cloned())
    }
}
