/// TMDB (The Movie Database) provider
///
/// Candidates come from the weekly trending list (/trending/all/week), which mixes
/// movies, TV shows and people. Movies become `Film`, TV shows become `Series`,
/// people are dropped. TMDB allows about four requests per second.
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateItem, TmdbTrendingResponse},
    services::providers::{CandidateProvider, RateLimiter},
};

const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(250);
const TRENDING_WINDOW: &str = "week";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
    rate_limiter: Arc<RateLimiter>,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, language: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
            rate_limiter: Arc::new(RateLimiter::new(MIN_REQUEST_INTERVAL)),
        }
    }

    fn trending_url(&self) -> String {
        format!("{}/trending/all/{}", self.api_url, TRENDING_WINDOW)
    }
}

/// Converts a trending response, skipping entries that are not movies or shows
fn trending_candidates(response: TmdbTrendingResponse) -> Vec<CandidateItem> {
    response
        .results
        .into_iter()
        .filter_map(|item| item.into_candidate())
        .collect()
}

#[async_trait::async_trait]
impl CandidateProvider for TmdbProvider {
    async fn fetch_candidates(&self) -> AppResult<Vec<CandidateItem>> {
        self.rate_limiter.wait().await;

        let response = self
            .http_client
            .get(self.trending_url())
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let trending: TmdbTrendingResponse = response.json().await?;
        let candidates = trending_candidates(trending);

        tracing::info!(
            candidates = candidates.len(),
            provider = "tmdb",
            "Trending candidates fetched"
        );

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
