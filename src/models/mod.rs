use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod profile;
pub mod providers;

pub use profile::{PreferenceProfile, WeightEntry};
pub use providers::{
    JikanAnime, JikanListResponse, TmdbMediaType, TmdbTrendingItem, TmdbTrendingResponse,
};

/// Well-known category tags. Categories are an open set, these are only the ones
/// the engine and providers know by name.
pub mod category {
    pub const FILM: &str = "Film";
    pub const SERIES: &str = "Series";
    pub const ANIME: &str = "Anime";
    pub const GAME: &str = "Game";
}

/// Returns a usable external score, treating zero, negative and NaN as missing
fn usable_score(score: Option<f64>) -> Option<f64> {
    score.filter(|s| s.is_finite() && *s > 0.0)
}

/// An entry in the user's collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    pub category: String,
    /// User rating, 0-10. Zero means unrated.
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub mal_score: Option<f64>,
    #[serde(default)]
    pub tmdb_score: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub studios: Vec<String>,
    #[serde(default)]
    pub mal_id: Option<i64>,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MediaItem {
    /// Creates an unrated item with no provider metadata
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            original_title: None,
            category: category.into(),
            rating: 0.0,
            mal_score: None,
            tmdb_score: None,
            genres: Vec::new(),
            studios: Vec::new(),
            mal_id: None,
            tmdb_id: None,
            notes: None,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }

    pub fn is_anime(&self) -> bool {
        self.category == category::ANIME
    }
}

/// Where a recommendation candidate came from
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    External,
}

/// A title offered by a metadata provider that may not be in the collection yet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    pub category: String,
    #[serde(default)]
    pub mal_score: Option<f64>,
    #[serde(default)]
    pub tmdb_score: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub studios: Vec<String>,
    #[serde(default)]
    pub mal_id: Option<i64>,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source: Source,
}

impl CandidateItem {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            original_title: None,
            category: category.into(),
            mal_score: None,
            tmdb_score: None,
            genres: Vec::new(),
            studios: Vec::new(),
            mal_id: None,
            tmdb_id: None,
            notes: None,
            image_url: None,
            source: Source::External,
        }
    }

    /// Provider score on the 0-10 scale, MAL first, TMDB second
    pub fn external_score(&self) -> Option<f64> {
        usable_score(self.mal_score).or_else(|| usable_score(self.tmdb_score))
    }

    pub fn is_anime(&self) -> bool {
        self.category == category::ANIME
    }
}

impl AsRef<CandidateItem> for CandidateItem {
    fn as_ref(&self) -> &CandidateItem {
        self
    }
}

/// A candidate with its relevance score and the explanation shown to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: CandidateItem,
    pub relevance_score: f64,
    pub reason: String,
}

impl AsRef<CandidateItem> for ScoredCandidate {
    fn as_ref(&self) -> &CandidateItem {
        &self.candidate
    }
}

/// Request body for adding an item to the collection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItem {
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    pub category: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub mal_score: Option<f64>,
    #[serde(default)]
    pub tmdb_score: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub studios: Vec<String>,
    #[serde(default)]
    pub mal_id: Option<i64>,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<NewMediaItem> for MediaItem {
    fn from(new: NewMediaItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            original_title: new.original_title,
            category: new.category,
            rating: new.rating,
            mal_score: new.mal_score,
            tmdb_score: new.tmdb_score,
            genres: new.genres,
            studios: new.studios,
            mal_id: new.mal_id,
            tmdb_id: new.tmdb_id,
            notes: new.notes,
            image_url: new.image_url,
            created_at: Utc::now(),
        }
    }
}
