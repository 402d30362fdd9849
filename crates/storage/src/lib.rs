mod dataset;

use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use reststop_core::Restroom;

pub use dataset::{sample_restrooms, DatasetConfig, COIMBATORE_CENTER};

pub trait VenueRepository: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Restroom>>;
    async fn get(&self, id: &str) -> Result<Option<Restroom>>;
    async fn replace_all(&self, restrooms: Vec<Restroom>) -> Result<()>;
}

/// In-memory venue store. The list order is the relevance/proximity order
/// the response engine relies on for its "closest N" answers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    restrooms: Arc<RwLock<Vec<Restroom>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restrooms(restrooms: Vec<Restroom>) -> Self {
        Self {
            restrooms: Arc::new(RwLock::new(restrooms)),
        }
    }
}

impl VenueRepository for MemoryStore {
    async fn load_all(&self) -> Result<Vec<Restroom>> {
        Ok(self.restrooms.read().clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Restroom>> {
        Ok(self
            .restrooms
            .read()
            .iter()
            .find(|restroom| restroom.id == id)
            .cloned())
    }

    async fn replace_all(&self, restrooms: Vec<Restroom>) -> Result<()> {
        *self.restrooms.write() = restrooms;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_round_trip_preserves_order() {
        let dataset = sample_restrooms(&DatasetConfig::default());
        let store = MemoryStore::with_restrooms(dataset.clone());

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, dataset);

        let first = store.get(&dataset[0].id).await.unwrap();
        assert_eq!(first.as_ref(), Some(&dataset[0]));
        assert!(store.get("restroom-999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_all_swaps_the_dataset() {
        let store = MemoryStore::with_restrooms(sample_restrooms(&DatasetConfig::default()));

        let reseeded = sample_restrooms(&DatasetConfig {
            seed: 99,
            ..DatasetConfig::default()
        });
        store.replace_all(reseeded.clone()).await.unwrap();

        assert_eq!(store.load_all().await.unwrap(), reseeded);
    }
}
