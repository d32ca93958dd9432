//! Laptop catalog storage

use crate::error::{Result, ServiceError};
use crate::grpc::proto::Laptop;
use crate::models::LaptopFilter;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait LaptopStore: Send + Sync {
    /// ## Errors
    ///
    /// `ServiceError::LaptopAlreadyExists` if the id is taken
    async fn save(&self, laptop: Laptop) -> Result<()>;

    async fn find(&self, id: &str) -> Result<Option<Laptop>>;

    /// Every stored laptop matching `filter`, in no particular order
    async fn search(&self, filter: &LaptopFilter) -> Result<Vec<Laptop>>;
}

#[derive(Debug, Default)]
pub struct InMemoryLaptopStore {
    laptops: RwLock<HashMap<String, Laptop>>,
}

impl InMemoryLaptopStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LaptopStore for InMemoryLaptopStore {
    async fn save(&self, laptop: Laptop) -> Result<()> {
        let mut laptops = self.laptops.write().await;

        if laptops.contains_key(&laptop.id) {
            return Err(ServiceError::LaptopAlreadyExists(laptop.id));
        }

        laptops.insert(laptop.id.clone(), laptop);
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<Laptop>> {
        Ok(self.laptops.read().await.get(id).cloned())
    }

    async fn search(&self, filter: &LaptopFilter) -> Result<Vec<Laptop>> {
        Ok(self
            .laptops
            .read()
            .await
            .values()
            .filter(|laptop| filter.matches(laptop))
            .cloned()
            .collect())
    }
}
