/// Metadata providers that supply recommendation candidates
///
/// Each provider turns one external catalogue (Jikan for anime, TMDB for film and
/// series) into `CandidateItem`s. Providers know nothing about the collection or
/// the scoring; they only fetch and convert.
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{error::AppResult, models::CandidateItem};

pub mod jikan;
pub mod tmdb;

pub use jikan::JikanProvider;
pub use tmdb::TmdbProvider;

/// Trait for candidate metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Fetch this provider's current candidate list
    ///
    /// Returns an error only when nothing at all could be fetched.
    async fn fetch_candidates(&self) -> AppResult<Vec<CandidateItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Spaces out requests to one upstream API
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until at least `min_interval` has passed since the previous request
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}
