pub mod cache;
pub mod collection;
pub mod postgres;
pub mod redis;

pub use cache::{CacheKey, InMemoryCache, KeyValueCache};
pub use collection::{CollectionStore, InMemoryCollectionStore};
pub use self::postgres::{create_pool, run_migrations, PgCollectionStore};
pub use self::redis::{create_redis_client, CacheWriterHandle, RedisCache};
