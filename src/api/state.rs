use std::sync::Arc;

use crate::db::{CollectionStore, InMemoryCache, InMemoryCollectionStore, KeyValueCache};
use crate::services::{CandidatePool, RecommendationService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub collection: Arc<dyn CollectionStore>,
    pub recommender: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(collection: Arc<dyn CollectionStore>, recommender: RecommendationService) -> Self {
        Self {
            collection,
            recommender: Arc::new(recommender),
        }
    }

    /// State backed entirely by process memory
    pub fn in_memory(candidates: CandidatePool, limit: usize) -> Self {
        let cache: Arc<dyn KeyValueCache> = Arc::new(InMemoryCache::new());
        Self::new(
            Arc::new(InMemoryCollectionStore::new()),
            RecommendationService::new(candidates, cache, limit),
        )
    }
}
