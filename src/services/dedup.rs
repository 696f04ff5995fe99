use std::collections::HashSet;

use crate::models::{CandidateItem, MediaItem};

/// Characters ignored when comparing titles
const TITLE_NOISE: &[char] = &[':', '-', '\'', '"', '’', '‘', '“', '”', '!', '?', '.', ','];

/// Lower-cases a title and strips whitespace and punctuation noise
pub fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !c.is_whitespace() && !TITLE_NOISE.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Identity lookups over a collection snapshot, built once per filtering pass
#[derive(Debug, Default)]
pub struct CollectionIndex {
    titles: HashSet<String>,
    original_titles: HashSet<String>,
    mal_ids: HashSet<i64>,
    tmdb_ids: HashSet<i64>,
}

impl CollectionIndex {
    pub fn new(collection: &[MediaItem]) -> Self {
        let mut index = Self::default();

        for item in collection {
            insert_title(&mut index.titles, &item.title);
            if let Some(original) = &item.original_title {
                insert_title(&mut index.original_titles, original);
            }
            if let Some(mal_id) = item.mal_id {
                index.mal_ids.insert(mal_id);
            }
            if let Some(tmdb_id) = item.tmdb_id {
                index.tmdb_ids.insert(tmdb_id);
            }
        }

        index
    }

    /// True when any identity signal ties the candidate to an owned item
    pub fn contains(&self, candidate: &CandidateItem) -> bool {
        let title = normalize_title(&candidate.title);
        if !title.is_empty() && self.titles.contains(&title) {
            return true;
        }

        if let Some(original) = &candidate.original_title {
            let original = normalize_title(original);
            if !original.is_empty()
                && (self.titles.contains(&original) || self.original_titles.contains(&original))
            {
                return true;
            }
        }

        if candidate.mal_id.is_some_and(|id| self.mal_ids.contains(&id)) {
            return true;
        }

        candidate.tmdb_id.is_some_and(|id| self.tmdb_ids.contains(&id))
    }
}

fn insert_title(set: &mut HashSet<String>, title: &str) {
    let normalized = normalize_title(title);
    if !normalized.is_empty() {
        set.insert(normalized);
    }
}

/// Drops candidates already present in the collection, keeping pool order
pub fn filter_owned<T: AsRef<CandidateItem>>(collection: &[MediaItem], candidates: Vec<T>) -> Vec<T> {
    let index = CollectionIndex::new(collection);
    let before = candidates.len();

    let kept: Vec<T> = candidates
        .into_iter()
        .filter(|candidate| !index.contains(candidate.as_ref()))
        .collect();

    tracing::debug!(
        candidates = before,
        duplicates = before - kept.len(),
        "Filtered candidates already in collection"
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category;

    fn owned(title: &str) -> MediaItem {
        MediaItem::new(title, category::ANIME)
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("Attack on Titan:"), "attackontitan");
        assert_eq!(normalize_title("  Re:Zero - Starting Life!? "), "rezerostartinglife");
        assert_eq!(normalize_title("Don't \"Look\" Up, Please."), "dontlookupplease");
    }

    #[test]
    fn test_normalize_title_keeps_other_symbols() {
        assert_eq!(normalize_title("`Hello`"), "`hello`");
        assert_eq!(normalize_title("Steins;Gate"), "steins;gate");
    }

    #[test]
    fn test_title_match_ignores_case_and_punctuation() {
        let collection = vec![owned("attack on titan")];
        let candidates = vec![CandidateItem::new("Attack on Titan:", category::ANIME)];

        assert!(filter_owned(&collection, candidates).is_empty());
    }

    #[test]
    fn test_original_title_matches_owned_title() {
        let collection = vec![owned("Shingeki no Kyojin")];
        let mut candidate = CandidateItem::new("Attack on Titan", category::ANIME);
        candidate.original_title = Some("Shingeki no Kyojin".to_string());

        assert!(filter_owned(&collection, vec![candidate]).is_empty());
    }

    #[test]
    fn test_original_title_matches_owned_original_title() {
        let mut item = owned("Attack on Titan");
        item.original_title = Some("進撃の巨人".to_string());
        let mut candidate = CandidateItem::new("AoT", category::ANIME);
        candidate.original_title = Some("進撃の巨人".to_string());

        assert!(filter_owned(&[item], vec![candidate]).is_empty());
    }

    #[test]
    fn test_owned_original_title_does_not_match_candidate_title() {
        let mut item = owned("Attack on Titan");
        item.original_title = Some("Shingeki no Kyojin".to_string());
        let candidate = CandidateItem::new("Shingeki no Kyojin", category::ANIME);

        assert_eq!(filter_owned(&[item], vec![candidate]).len(), 1);
    }

    #[test]
    fn test_mal_id_match_despite_different_title() {
        let mut item = owned("Frieren");
        item.mal_id = Some(52991);
        let mut candidate = CandidateItem::new("Sousou no Frieren", category::ANIME);
        candidate.mal_id = Some(52991);

        assert!(filter_owned(&[item], vec![candidate]).is_empty());
    }

    #[test]
    fn test_tmdb_id_match() {
        let mut item = MediaItem::new("Dune 2", category::FILM);
        item.tmdb_id = Some(693134);
        let mut candidate = CandidateItem::new("Dune: Part Two", category::FILM);
        candidate.tmdb_id = Some(693134);

        assert!(filter_owned(&[item], vec![candidate]).is_empty());
    }

    #[test]
    fn test_unrelated_candidates_kept_in_order() {
        let mut item = owned("Naruto");
        item.mal_id = Some(20);
        let mut first = CandidateItem::new("Bleach", category::ANIME);
        first.mal_id = Some(269);
        let second = CandidateItem::new("One Piece", category::ANIME);

        let kept = filter_owned(&[item], vec![first, second]);
        let titles: Vec<&str> = kept.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Bleach", "One Piece"]);
    }

    #[test]
    fn test_punctuation_only_titles_never_match() {
        let collection = vec![owned("!!!")];
        let candidates = vec![CandidateItem::new("???", category::ANIME)];

        assert_eq!(filter_owned(&collection, candidates).len(), 1);
    }
}
