use std::collections::BTreeMap;

use crate::models::{CandidateItem, PreferenceProfile, WeightEntry};

pub const GENRE_WEIGHT: f64 = 30.0;
pub const STUDIO_WEIGHT: f64 = 20.0;
pub const EXTERNAL_SCORE_WEIGHT: f64 = 25.0;
pub const CATEGORY_WEIGHT: f64 = 25.0;

/// Weighted sum of the signals that could be evaluated for one candidate
///
/// `weight_used` grows by a signal's nominal weight whenever the signal was
/// evaluated, even if it contributed nothing. Skipped signals leave both fields
/// untouched, so missing metadata never drags the normalized score down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAccumulator {
    pub numerator: f64,
    pub weight_used: f64,
}

impl ScoreAccumulator {
    /// Records an evaluated signal; `fraction` is its match strength in 0..=1
    pub fn add(&mut self, weight: f64, fraction: f64) {
        self.numerator += fraction * weight;
        self.weight_used += weight;
    }

    /// Normalized score on the 0-100 scale
    pub fn score(&self) -> f64 {
        if self.weight_used <= 0.0 {
            return 0.0;
        }
        (self.numerator / self.weight_used * 100.0).clamp(0.0, 100.0)
    }
}

/// Mean affinity of `tags` against `weights`, averaged over all tags
///
/// Tags missing from the profile count as zero and dilute the mean.
fn tag_affinity(tags: &[String], weights: &BTreeMap<String, WeightEntry>, liked: u32) -> f64 {
    let total: f64 = tags
        .iter()
        .filter_map(|tag| weights.get(tag))
        .map(|entry| entry.affinity(liked))
        .sum();
    total / tags.len().max(1) as f64
}

/// Accumulates every applicable signal for a candidate
pub fn accumulate(candidate: &CandidateItem, profile: &PreferenceProfile) -> ScoreAccumulator {
    let mut acc = ScoreAccumulator::default();

    // Nothing is liked yet, no signal has a reference point
    if profile.is_empty() {
        return acc;
    }

    let liked = profile.liked_item_count;

    if !candidate.genres.is_empty() {
        acc.add(
            GENRE_WEIGHT,
            tag_affinity(&candidate.genres, &profile.genre_weights, liked),
        );
    }

    if candidate.is_anime() && !candidate.studios.is_empty() {
        acc.add(
            STUDIO_WEIGHT,
            tag_affinity(&candidate.studios, &profile.studio_weights, liked),
        );
    }

    if let Some(score) = candidate.external_score() {
        let proximity = (score - profile.avg_rating).abs() / 10.0;
        acc.add(EXTERNAL_SCORE_WEIGHT, (1.0 - proximity).max(0.0));
    }

    if let Some(entry) = profile.category_weights.get(&candidate.category) {
        acc.add(CATEGORY_WEIGHT, entry.affinity(liked));
    }

    acc
}

/// Relevance of a candidate to the profile, 0-100
pub fn relevance_score(candidate: &CandidateItem, profile: &PreferenceProfile) -> f64 {
    accumulate(candidate, profile).score()
}
