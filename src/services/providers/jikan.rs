/// Jikan (unofficial MyAnimeList) provider
///
/// Candidates come from two list endpoints:
/// 1. Current season: /seasons/now
/// 2. Top TV anime: /top/anime?type=tv
///
/// Jikan allows roughly three requests per second, hence the 334 ms spacing.
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateItem, JikanListResponse},
    services::providers::{CandidateProvider, RateLimiter},
};

const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(334);
const LIST_LIMIT: u32 = 10;

#[derive(Clone)]
pub struct JikanProvider {
    http_client: HttpClient,
    api_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl JikanProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::new(MIN_REQUEST_INTERVAL)),
        }
    }

    fn seasonal_url(&self) -> String {
        format!("{}/seasons/now", self.api_url)
    }

    fn top_url(&self) -> String {
        format!("{}/top/anime", self.api_url)
    }

    /// Fetches one Jikan list endpoint and converts its entries
    async fn fetch_list(&self, url: &str, query: &[(&str, String)]) -> AppResult<Vec<CandidateItem>> {
        self.rate_limiter.wait().await;

        let response = self.http_client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Jikan API returned status {}: {}",
                status, body
            )));
        }

        let list: JikanListResponse = response.json().await?;
        Ok(list.data.into_iter().map(CandidateItem::from).collect())
    }
}

#[async_trait::async_trait]
impl CandidateProvider for JikanProvider {
    async fn fetch_candidates(&self) -> AppResult<Vec<CandidateItem>> {
        let limit = LIST_LIMIT.to_string();

        let seasonal = self
            .fetch_list(&self.seasonal_url(), &[("limit", limit.clone())])
            .await;
        let top = self
            .fetch_list(
                &self.top_url(),
                &[("type", "tv".to_string()), ("limit", limit)],
            )
            .await;

        let mut candidates = Vec::new();
        let mut failures = 0;

        for (list, result) in [("seasonal", seasonal), ("top", top)] {
            match result {
                Ok(items) => candidates.extend(items),
                Err(e) => {
                    tracing::warn!(error = %e, list = list, provider = "jikan", "Anime list fetch failed");
                    failures += 1;
                }
            }
        }

        if failures == 2 {
            return Err(AppError::ExternalApi(
                "Failed to fetch any Jikan anime list".to_string(),
            ));
        }

        tracing::info!(
            candidates = candidates.len(),
            provider = "jikan",
            "Anime candidates fetched"
        );

        Ok(candidates)
    }

    fn name(&self) -> &'static str {
        "jikan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let provider = JikanProvider::new("https://api.jikan.moe/v4/".to_string());
        assert_eq!(provider.seasonal_url(), "https://api.jikan.moe/v4/seasons/now");
        assert_eq!(provider.top_url(), "https://api.jikan.moe/v4/top/anime");
    }

    #[test]
    fn test_list_response_deserialization() {
        let json = r#"{
            "pagination": { "has_next_page": true },
            "data": [
                { "mal_id": 5114, "title": "Fullmetal Alchemist: Brotherhood", "score": 9.1,
                  "genres": [{ "name": "Action" }], "studios": [{ "name": "Bones" }] },
                { "mal_id": 9253, "title": "Steins;Gate", "score": 9.07 }
            ]
        }"#;

        let list: JikanListResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<CandidateItem> =
            list.data.into_iter().map(CandidateItem::from).collect();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].studios, vec!["Bones"]);
        assert_eq!(candidates[1].mal_id, Some(9253));
    }

    #[tokio::test]
    async fn test_failing_lists_are_an_error() {
        // reqwest rejects the scheme before any connection is attempted
        let provider = JikanProvider::new("unsupported://jikan.invalid".to_string());
        let result = provider.fetch_candidates().await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
