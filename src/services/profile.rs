use crate::models::{MediaItem, PreferenceProfile};

/// Minimum rating for an item to count as liked
pub const LIKED_THRESHOLD: f64 = 7.0;

/// Builds the taste profile of a collection snapshot
///
/// Only liked items (rating >= 7) contribute. Genres and the item's own category are
/// counted for every liked item; studios only for anime, where they carry taste.
/// A collection without liked items yields the zero profile.
pub fn build_profile(collection: &[MediaItem]) -> PreferenceProfile {
    let liked: Vec<&MediaItem> = collection
        .iter()
        .filter(|item| item.rating >= LIKED_THRESHOLD)
        .collect();

    if liked.is_empty() {
        return PreferenceProfile::default();
    }

    let mut profile = PreferenceProfile::default();

    for item in &liked {
        for genre in &item.genres {
            profile
                .genre_weights
                .entry(genre.clone())
                .or_default()
                .record(item.rating);
        }

        if item.is_anime() {
            for studio in &item.studios {
                profile
                    .studio_weights
                    .entry(studio.clone())
                    .or_default()
                    .record(item.rating);
            }
        }

        profile
            .category_weights
            .entry(item.category.clone())
            .or_default()
            .record(item.rating);
    }

    let total_rating: f64 = liked.iter().map(|item| item.rating).sum();
    profile.liked_item_count = liked.len() as u32;
    profile.avg_rating = total_rating / liked.len() as f64;

    tracing::debug!(
        liked = profile.liked_item_count,
        genres = profile.genre_weights.len(),
        studios = profile.studio_weights.len(),
        avg_rating = profile.avg_rating,
        "Preference profile built"
    );

    profile
}
