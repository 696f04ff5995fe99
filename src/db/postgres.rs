use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::db::collection::CollectionStore;
use crate::error::AppResult;
use crate::models::MediaItem;

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, FromRow)]
struct MediaItemRow {
    id: Uuid,
    title: String,
    original_title: Option<String>,
    category: String,
    rating: f64,
    mal_score: Option<f64>,
    tmdb_score: Option<f64>,
    genres: Vec<String>,
    studios: Vec<String>,
    mal_id: Option<i64>,
    tmdb_id: Option<i64>,
    notes: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<MediaItemRow> for MediaItem {
    fn from(row: MediaItemRow) -> Self {
        MediaItem {
            id: row.id,
            title: row.title,
            original_title: row.original_title,
            category: row.category,
            rating: row.rating,
            mal_score: row.mal_score,
            tmdb_score: row.tmdb_score,
            genres: row.genres,
            studios: row.studios,
            mal_id: row.mal_id,
            tmdb_id: row.tmdb_id,
            notes: row.notes,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

/// Collection stored in the `media_items` table
#[derive(Clone)]
pub struct PgCollectionStore {
    pool: PgPool,
}

impl PgCollectionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CollectionStore for PgCollectionStore {
    async fn list_items(&self) -> AppResult<Vec<MediaItem>> {
        let rows = sqlx::query_as::<_, MediaItemRow>(
            r#"
            SELECT id, title, original_title, category, rating, mal_score, tmdb_score,
                   genres, studios, mal_id, tmdb_id, notes, image_url, created_at
            FROM media_items
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(items = rows.len(), "Loaded collection snapshot");

        Ok(rows.into_iter().map(MediaItem::from).collect())
    }

    async fn add_item(&self, item: MediaItem) -> AppResult<MediaItem> {
        sqlx::query(
            r#"
            INSERT INTO media_items (
                id, title, original_title, category, rating, mal_score, tmdb_score,
                genres, studios, mal_id, tmdb_id, notes, image_url, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.original_title)
        .bind(&item.category)
        .bind(item.rating)
        .bind(item.mal_score)
        .bind(item.tmdb_score)
        .bind(&item.genres)
        .bind(&item.studios)
        .bind(item.mal_id)
        .bind(item.tmdb_id)
        .bind(&item.notes)
        .bind(&item.image_url)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(id = %item.id, title = %item.title, "Media item added");

        Ok(item)
    }

    async fn find_by_mal_id(&self, mal_id: i64) -> AppResult<Option<MediaItem>> {
        let row = sqlx::query_as::<_, MediaItemRow>(
            r#"
            SELECT id, title, original_title, category, rating, mal_score, tmdb_score,
                   genres, studios, mal_id, tmdb_id, notes, image_url, created_at
            FROM media_items
            WHERE mal_id = $1
            LIMIT 1
            "#,
        )
        .bind(mal_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MediaItem::from))
    }
}
