use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MediaItem, NewMediaItem, PreferenceProfile},
    services::{profile::build_profile, RecommendationSet},
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get the whole collection
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<MediaItem>>> {
    let items = state.collection.list_items().await?;
    Ok(Json(items))
}

/// Add an item to the collection, e.g. from a recommendation card
pub async fn add_item(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<NewMediaItem>,
) -> AppResult<(StatusCode, Json<MediaItem>)> {
    validate_new_item(&request)?;

    if let Some(mal_id) = request.mal_id {
        if let Some(existing) = state.collection.find_by_mal_id(mal_id).await? {
            tracing::info!(
                request_id = %request_id,
                mal_id,
                existing_id = %existing.id,
                "Duplicate anime rejected"
            );
            return Err(AppError::Conflict(format!(
                "\"{}\" is already in the collection",
                existing.title
            )));
        }
    }

    let item = state.collection.add_item(MediaItem::from(request)).await?;

    tracing::info!(
        request_id = %request_id,
        id = %item.id,
        category = %item.category,
        "Item added to collection"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

fn validate_new_item(request: &NewMediaItem) -> AppResult<()> {
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
    }
    if request.category.trim().is_empty() {
        return Err(AppError::InvalidInput("Category cannot be empty".to_string()));
    }
    if !(0.0..=10.0).contains(&request.rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between 0 and 10, got {}",
            request.rating
        )));
    }
    Ok(())
}

/// Get the taste profile derived from the current collection
pub async fn get_profile(State(state): State<AppState>) -> AppResult<Json<PreferenceProfile>> {
    let items = state.collection.list_items().await?;
    Ok(Json(build_profile(&items)))
}

/// Get recommendations, served from cache while fresh
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<RecommendationSet>> {
    let items = state.collection.list_items().await?;
    let set = state.recommender.recommend(&items, false).await;

    tracing::info!(
        request_id = %request_id,
        count = set.recommendations.len(),
        from_cache = set.from_cache,
        "Recommendations served"
    );

    Ok(Json(set))
}

/// Recompute recommendations, ignoring the cache
pub async fn refresh_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<RecommendationSet>> {
    let items = state.collection.list_items().await?;
    let set = state.recommender.refresh(&items).await;

    tracing::info!(
        request_id = %request_id,
        count = set.recommendations.len(),
        failed = set.error.is_some(),
        "Recommendations refreshed"
    );

    Ok(Json(set))
}
