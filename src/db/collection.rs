use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::MediaItem;

/// Source of collection snapshots and sink for newly added items
///
/// Recommendation code only ever reads a snapshot; `add_item` backs the
/// "add to collection" action offered next to a recommendation.
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    async fn list_items(&self) -> AppResult<Vec<MediaItem>>;

    async fn add_item(&self, item: MediaItem) -> AppResult<MediaItem>;

    /// Existing entry for a MyAnimeList id, used to refuse duplicate anime
    async fn find_by_mal_id(&self, mal_id: i64) -> AppResult<Option<MediaItem>>;
}

/// Collection held in process memory, in insertion order
#[derive(Default)]
pub struct InMemoryCollectionStore {
    items: RwLock<Vec<MediaItem>>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<MediaItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

#[async_trait::async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn list_items(&self) -> AppResult<Vec<MediaItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn add_item(&self, item: MediaItem) -> AppResult<MediaItem> {
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn find_by_mal_id(&self, mal_id: i64) -> AppResult<Option<MediaItem>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.mal_id == Some(mal_id)).cloned())
    }
}
