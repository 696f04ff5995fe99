use crate::models::{CandidateItem, PreferenceProfile};

pub const FALLBACK_REASON: &str = "might suit you";

/// Share of liked items a category needs before it is called a favorite
const FAVORITE_CATEGORY_SHARE: f64 = 0.3;

/// Picks the one line shown next to a recommendation
///
/// First match wins: liked genre, favorite studio, similar external score,
/// favorite category, then a generic fallback.
pub fn explain(candidate: &CandidateItem, profile: &PreferenceProfile) -> String {
    if let Some(genre) = candidate
        .genres
        .iter()
        .find(|genre| profile.genre_weights.contains_key(*genre))
    {
        return format!("liked genre: {}", genre);
    }

    if let Some(studio) = candidate
        .studios
        .iter()
        .find(|studio| profile.studio_weights.contains_key(*studio))
    {
        return format!("favorite studio: {}", studio);
    }

    if let Some(score) = candidate.external_score() {
        if score >= profile.avg_rating - 1.0 {
            return format!("similar external score: {:.1}", score);
        }
    }

    if let Some(entry) = profile.category_weights.get(&candidate.category) {
        if f64::from(entry.count) >= f64::from(profile.liked_item_count) * FAVORITE_CATEGORY_SHARE {
            return format!("favorite category: {}", candidate.category);
        }
    }

    FALLBACK_REASON.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{category, MediaItem};
    use crate::services::profile::build_profile;

    fn profile() -> PreferenceProfile {
        let mut collection = Vec::new();
        for (title, cat, genre, studio) in [
            ("Mob Psycho 100", category::ANIME, "Comedy", "Bones"),
            ("Fullmetal Alchemist", category::ANIME, "Adventure", "Bones"),
            ("Heat", category::FILM, "Crime", ""),
            ("Se7en", category::FILM, "Thriller", ""),
        ] {
            let mut item = MediaItem::new(title, cat);
            item.rating = 8.0;
            item.genres = vec![genre.to_string()];
            if !studio.is_empty() {
                item.studios = vec![studio.to_string()];
            }
            collection.push(item);
        }
        build_profile(&collection)
    }

    #[test]
    fn test_genre_reason_uses_first_matching_genre() {
        let mut candidate = CandidateItem::new("Spy x Family", category::ANIME);
        candidate.genres = vec!["Slice of Life".into(), "Comedy".into(), "Adventure".into()];
        candidate.studios = vec!["Bones".into()];

        assert_eq!(explain(&candidate, &profile()), "liked genre: Comedy");
    }

    #[test]
    fn test_studio_reason_when_no_genre_matches() {
        let mut candidate = CandidateItem::new("Bungo Stray Dogs", category::ANIME);
        candidate.genres = vec!["Mystery".into()];
        candidate.studios = vec!["Bones".into()];

        assert_eq!(explain(&candidate, &profile()), "favorite studio: Bones");
    }

    #[test]
    fn test_external_score_reason() {
        let mut candidate = CandidateItem::new("Celeste", category::GAME);
        candidate.tmdb_score = Some(7.04);

        assert_eq!(explain(&candidate, &profile()), "similar external score: 7.0");
    }

    #[test]
    fn test_low_external_score_falls_through_to_category() {
        let mut candidate = CandidateItem::new("Some Film", category::FILM);
        candidate.tmdb_score = Some(5.0);

        assert_eq!(explain(&candidate, &profile()), "favorite category: Film");
    }

    #[test]
    fn test_minor_category_is_not_a_favorite() {
        let mut collection = Vec::new();
        for i in 0..9 {
            let mut item = MediaItem::new(format!("Film {}", i), category::FILM);
            item.rating = 9.0;
            collection.push(item);
        }
        let mut game = MediaItem::new("Hades", category::GAME);
        game.rating = 9.0;
        collection.push(game);

        let candidate = CandidateItem::new("Another Game", category::GAME);
        assert_eq!(explain(&candidate, &build_profile(&collection)), FALLBACK_REASON);
    }

    #[test]
    fn test_fallback_reason() {
        let candidate = CandidateItem::new("Unknown", "Podcast");
        assert_eq!(explain(&candidate, &profile()), FALLBACK_REASON);
    }
}
