use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::CandidateItem,
    services::providers::CandidateProvider,
};

/// Gathers recommendation candidates from every configured provider
#[derive(Clone)]
pub struct CandidatePool {
    providers: Vec<Arc<dyn CandidateProvider>>,
}

impl CandidatePool {
    pub fn new(providers: Vec<Arc<dyn CandidateProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Fetches all providers in parallel and concatenates their lists
    ///
    /// Results keep provider order regardless of which request finishes first.
    /// A failing provider is skipped; the pool fails only when none succeeded.
    pub async fn fetch(&self) -> AppResult<Vec<CandidateItem>> {
        if self.providers.is_empty() {
            return Err(AppError::ExternalApi(
                "No candidate providers configured".to_string(),
            ));
        }

        let mut tasks = Vec::new();
        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let name = provider.name();
            let task = tokio::spawn(async move { provider.fetch_candidates().await });
            tasks.push((name, task));
        }

        let mut candidates = Vec::new();
        let mut errors = Vec::new();

        for (name, task) in tasks {
            match task.await {
                Ok(Ok(items)) => candidates.extend(items),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, provider = name, "Candidate fetch failed");
                    errors.push(e);
                }
                Err(e) => {
                    tracing::error!(error = %e, provider = name, "Task join error");
                    errors.push(AppError::Internal(e.to_string()));
                }
            }
        }

        if errors.len() == self.providers.len() {
            return Err(AppError::ExternalApi(
                "Failed to fetch candidates from any provider".to_string(),
            ));
        }

        if !errors.is_empty() {
            tracing::warn!(
                success_count = self.providers.len() - errors.len(),
                error_count = errors.len(),
                "Partial candidate fetch failure"
            );
        }

        Ok(dedup_pool(candidates))
    }
}

/// Drops repeats inside the pool, e.g. a seasonal show that is also in the top list
fn dedup_pool(candidates: Vec<CandidateItem>) -> Vec<CandidateItem> {
    let mut seen_mal = HashSet::new();
    let mut seen_tmdb = HashSet::new();

    candidates
        .into_iter()
        .filter(|candidate| {
            let mal_repeat = candidate.mal_id.is_some_and(|id| !seen_mal.insert(id));
            let tmdb_repeat = candidate.tmdb_id.is_some_and(|id| !seen_tmdb.insert(id));
            !(mal_repeat || tmdb_repeat)
        })
        .collect()
}
