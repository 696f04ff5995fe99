use std::collections::HashMap;
use std::fmt::Display;

use tokio::sync::RwLock;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The last computed recommendation set
    Recommendations,
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Recommendations => write!(f, "recommendations_cache"),
        }
    }
}

/// String key-value store backing the recommendation cache
///
/// Values are opaque serialized payloads; parsing them, and deciding what a
/// corrupt payload means, is the caller's concern.
#[async_trait::async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<String>>;

    async fn set(&self, key: &CacheKey, value: String) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Process-local cache, used when no Redis is configured and in tests
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueCache for InMemoryCache {
    async fn get(&self, key: &CacheKey) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(&key.to_string()).cloned())
    }

    async fn set(&self, key: &CacheKey, value: String) -> AppResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_recommendations() {
        assert_eq!(CacheKey::Recommendations.to_string(), "recommendations_cache");
    }

    #[tokio::test]
    async fn test_in_memory_cache_miss() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get(&CacheKey::Recommendations).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_in_memory_cache_overwrites() {
        let cache = InMemoryCache::new();
        cache
            .set(&CacheKey::Recommendations, "first".to_string())
            .await
            .unwrap();
        cache
            .set(&CacheKey::Recommendations, "second".to_string())
            .await
            .unwrap();

        assert_eq!(
            cache.get(&CacheKey::Recommendations).await.unwrap(),
            Some("second".to_string())
        );
    }
}
