use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mediatrack_api::{
    api::{create_router, AppState},
    config::Config,
    db::{
        create_pool, create_redis_client, run_migrations, CacheWriterHandle, CollectionStore,
        InMemoryCache, InMemoryCollectionStore, KeyValueCache, PgCollectionStore, RedisCache,
    },
    services::{
        providers::{CandidateProvider, JikanProvider, TmdbProvider},
        CandidatePool, RecommendationService,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediatrack_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let collection: Arc<dyn CollectionStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            run_migrations(&pool).await?;
            tracing::info!("Using PostgreSQL collection store");
            Arc::new(PgCollectionStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, collection is kept in memory");
            Arc::new(InMemoryCollectionStore::new())
        }
    };

    let (cache, cache_writer): (Arc<dyn KeyValueCache>, Option<CacheWriterHandle>) =
        match &config.redis_url {
            Some(url) => {
                let (cache, handle) = RedisCache::new(create_redis_client(url)?);
                tracing::info!("Using Redis recommendation cache");
                (Arc::new(cache), Some(handle))
            }
            None => {
                tracing::warn!("REDIS_URL not set, recommendation cache is kept in memory");
                (Arc::new(InMemoryCache::new()), None)
            }
        };

    let mut providers: Vec<Arc<dyn CandidateProvider>> =
        vec![Arc::new(JikanProvider::new(config.jikan_api_url.clone()))];
    match &config.tmdb_api_key {
        Some(key) => providers.push(Arc::new(TmdbProvider::new(
            key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
        ))),
        None => tracing::warn!("TMDB_API_KEY not set, film and series candidates are disabled"),
    }

    let candidates = CandidatePool::new(providers);
    tracing::info!(providers = ?candidates.provider_names(), "Candidate providers configured");

    let recommender = RecommendationService::new(candidates, cache, config.recommendation_limit);
    let app = create_router(AppState::new(collection, recommender));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
