use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db::{CacheKey, KeyValueCache},
    models::{CandidateItem, MediaItem, ScoredCandidate},
    services::{
        candidates::CandidatePool, dedup::filter_owned, profile::build_profile,
        reason::explain, scoring::relevance_score,
    },
};

/// Number of recommendations returned when the caller does not ask otherwise
pub const DEFAULT_LIMIT: usize = 6;

/// Below this many rated items the profile is too thin to recommend from
pub const MIN_RATED_ITEMS: usize = 5;

/// How long a cached recommendation set is served without recomputation
pub fn freshness_window() -> Duration {
    Duration::hours(24)
}

/// Whether the collection has enough rated items to recommend from
pub fn has_enough_ratings(collection: &[MediaItem]) -> bool {
    collection.iter().filter(|item| item.is_rated()).count() >= MIN_RATED_ITEMS
}

/// Ranks an external candidate pool against a collection snapshot
///
/// Builds the profile, scores and explains every candidate, drops the ones the
/// collection already holds, then sorts by relevance (ties keep pool order) and
/// truncates to `limit`. Returns nothing when fewer than five items are rated.
pub fn get_recommendations(
    collection: &[MediaItem],
    pool: &[CandidateItem],
    limit: usize,
) -> Vec<ScoredCandidate> {
    if !has_enough_ratings(collection) {
        return Vec::new();
    }

    let profile = build_profile(collection);

    let scored: Vec<ScoredCandidate> = pool
        .iter()
        .map(|candidate| ScoredCandidate {
            relevance_score: relevance_score(candidate, &profile),
            reason: explain(candidate, &profile),
            candidate: candidate.clone(),
        })
        .collect();

    let mut ranked = filter_owned(collection, scored);
    ranked.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    ranked.truncate(limit);
    ranked
}

/// Cache payload: the last computed set and when it was computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRecommendations {
    pub data: Vec<ScoredCandidate>,
    pub timestamp: DateTime<Utc>,
}

impl CachedRecommendations {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp < freshness_window()
    }
}

/// What the caller gets back from one recommendation cycle
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub recommendations: Vec<ScoredCandidate>,
    /// When the returned set was computed
    pub last_refresh: Option<DateTime<Utc>>,
    pub from_cache: bool,
    /// Set when live computation failed and a fallback was served
    pub error: Option<String>,
}

impl RecommendationSet {
    /// Serves a cached set, minus anything added to the collection since it was computed
    fn from_cached(
        cached: CachedRecommendations,
        collection: &[MediaItem],
        error: Option<String>,
    ) -> Self {
        Self {
            recommendations: filter_owned(collection, cached.data),
            last_refresh: Some(cached.timestamp),
            from_cache: true,
            error,
        }
    }
}

/// Recommendation cycle with caching and provider-failure fallback
pub struct RecommendationService {
    candidates: CandidatePool,
    cache: Arc<dyn KeyValueCache>,
    limit: usize,
}

impl RecommendationService {
    pub fn new(candidates: CandidatePool, cache: Arc<dyn KeyValueCache>, limit: usize) -> Self {
        Self {
            candidates,
            cache,
            limit,
        }
    }

    /// Returns recommendations for a collection snapshot
    ///
    /// A fresh cached set is served unless `force_refresh` is set. Otherwise the
    /// candidate pool is fetched and ranked, and the result cached. If fetching
    /// fails the last cached set is served whatever its age, or an empty set.
    pub async fn recommend(&self, collection: &[MediaItem], force_refresh: bool) -> RecommendationSet {
        if !has_enough_ratings(collection) {
            tracing::debug!("Not enough rated items for recommendations");
            return RecommendationSet::default();
        }

        if !force_refresh {
            if let Some(cached) = self.load_cached().await {
                if cached.is_fresh(Utc::now()) {
                    tracing::debug!(timestamp = %cached.timestamp, "Serving cached recommendations");
                    return RecommendationSet::from_cached(cached, collection, None);
                }
            }
        }

        match self.candidates.fetch().await {
            Ok(pool) => {
                let recommendations = get_recommendations(collection, &pool, self.limit);
                let timestamp = Utc::now();

                tracing::info!(
                    pool = pool.len(),
                    recommendations = recommendations.len(),
                    forced = force_refresh,
                    "Recommendations computed"
                );

                self.store(&CachedRecommendations {
                    data: recommendations.clone(),
                    timestamp,
                })
                .await;

                RecommendationSet {
                    recommendations,
                    last_refresh: Some(timestamp),
                    from_cache: false,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Recommendation refresh failed");
                let message = e.to_string();

                match self.load_cached().await {
                    Some(cached) => {
                        tracing::warn!(timestamp = %cached.timestamp, "Falling back to cached recommendations");
                        RecommendationSet::from_cached(cached, collection, Some(message))
                    }
                    None => RecommendationSet {
                        error: Some(message),
                        ..RecommendationSet::default()
                    },
                }
            }
        }
    }

    /// Recomputes regardless of cache freshness
    pub async fn refresh(&self, collection: &[MediaItem]) -> RecommendationSet {
        self.recommend(collection, true).await
    }

    /// Reads the cached set; unreachable or unparsable entries count as a miss
    async fn load_cached(&self) -> Option<CachedRecommendations> {
        let raw = match self.cache.get(&CacheKey::Recommendations).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, backend = self.cache.name(), "Cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(cached) => Some(cached),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unparsable cached recommendations");
                None
            }
        }
    }

    async fn store(&self, entry: &CachedRecommendations) {
        let json = match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        if let Err(e) = self.cache.set(&CacheKey::Recommendations, json).await {
            tracing::warn!(error = %e, backend = self.cache.name(), "Cache write failed");
        }
    }
}
