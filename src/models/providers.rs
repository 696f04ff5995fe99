use serde::Deserialize;

use super::{category, CandidateItem, Source};

// ============================================================================
// Jikan (MyAnimeList) API Types
// ============================================================================

/// Envelope of Jikan list endpoints (`/seasons/now`, `/top/anime`)
#[derive(Debug, Clone, Deserialize)]
pub struct JikanListResponse {
    #[serde(default)]
    pub data: Vec<JikanAnime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnime {
    pub mal_id: i64,
    pub title: String,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default)]
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub images: Option<JikanImages>,
    #[serde(default)]
    pub genres: Vec<JikanNamedEntry>,
    #[serde(default)]
    pub studios: Vec<JikanNamedEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanNamedEntry {
    pub name: String,
}

impl From<JikanAnime> for CandidateItem {
    fn from(anime: JikanAnime) -> Self {
        let image_url = anime
            .images
            .and_then(|images| images.jpg)
            .and_then(|jpg| jpg.large_image_url.or(jpg.image_url));

        CandidateItem {
            original_title: anime.title_japanese.or_else(|| Some(anime.title.clone())),
            title: anime.title,
            category: category::ANIME.to_string(),
            mal_score: anime.score,
            tmdb_score: None,
            genres: anime.genres.into_iter().map(|g| g.name).collect(),
            studios: anime.studios.into_iter().map(|s| s.name).collect(),
            mal_id: Some(anime.mal_id),
            tmdb_id: None,
            notes: anime.synopsis,
            image_url,
            source: Source::External,
        }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Response of `/trending/all/{window}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTrendingResponse {
    #[serde(default)]
    pub results: Vec<TmdbTrendingItem>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TmdbMediaType {
    Movie,
    Tv,
    #[serde(other)]
    Other,
}

/// A trending entry; movies carry `title`, TV shows carry `name`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTrendingItem {
    pub id: i64,
    pub media_type: TmdbMediaType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl TmdbTrendingItem {
    /// Converts a movie or TV entry; anything else (people) yields `None`
    pub fn into_candidate(self) -> Option<CandidateItem> {
        let (title, original, category) = match self.media_type {
            TmdbMediaType::Movie => (self.title?, self.original_title, category::FILM),
            TmdbMediaType::Tv => (self.name?, self.original_name, category::SERIES),
            TmdbMediaType::Other => return None,
        };

        Some(CandidateItem {
            original_title: original.filter(|o| *o != title),
            title,
            category: category.to_string(),
            mal_score: None,
            tmdb_score: self.vote_average.filter(|v| *v > 0.0),
            genres: self
                .genre_ids
                .iter()
                .filter_map(|id| tmdb_genre_name(*id))
                .map(str::to_string)
                .collect(),
            studios: Vec::new(),
            mal_id: None,
            tmdb_id: Some(self.id),
            notes: self.overview.filter(|o| !o.is_empty()),
            image_url: self
                .poster_path
                .map(|path| format!("{}{}", TMDB_IMAGE_BASE, path)),
            source: Source::External,
        })
    }
}

/// Fixed TMDB genre table covering both movie and TV ids
pub fn tmdb_genre_name(id: i64) -> Option<&'static str> {
    let name = match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        10759 => "Action & Adventure",
        10762 => "Kids",
        10763 => "News",
        10764 => "Reality",
        10765 => "Sci-Fi & Fantasy",
        10766 => "Soap",
        10767 => "Talk",
        10768 => "War & Politics",
        _ => return None,
    };
    Some(name)
}
