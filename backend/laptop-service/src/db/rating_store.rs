//! Per-laptop score aggregates

use crate::error::Result;
use crate::models::Rating;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Record `score` for `laptop_id` and return the updated aggregate
    async fn add(&self, laptop_id: &str, score: f64) -> Result<Rating>;
}

#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    ratings: RwLock<HashMap<String, Rating>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn add(&self, laptop_id: &str, score: f64) -> Result<Rating> {
        let mut ratings = self.ratings.write().await;
        let rating = ratings.entry(laptop_id.to_string()).or_default();
        rating.add(score);
        Ok(*rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_accumulates_per_laptop() {
        let store = InMemoryRatingStore::new();

        store.add("a", 5.0).await.unwrap();
        let a = store.add("a", 7.0).await.unwrap();
        let b = store.add("b", 3.0).await.unwrap();

        assert_eq!(a.count, 2);
        assert_eq!(a.average(), 6.0);
        assert_eq!(b.count, 1);
    }
}
