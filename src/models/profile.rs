use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate of liked items sharing one genre, studio or category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub count: u32,
    pub total_rating: f64,
}

impl WeightEntry {
    pub fn record(&mut self, rating: f64) {
        self.count += 1;
        self.total_rating += rating;
    }

    /// Share of liked items carrying this key times their mean rating on a 0-1 scale
    pub fn affinity(&self, liked_item_count: u32) -> f64 {
        if self.count == 0 || liked_item_count == 0 {
            return 0.0;
        }
        let share = f64::from(self.count) / f64::from(liked_item_count);
        let mean_rating = self.total_rating / f64::from(self.count);
        share * (mean_rating / 10.0)
    }
}

/// Taste profile derived from the liked part of a collection snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceProfile {
    pub genre_weights: BTreeMap<String, WeightEntry>,
    pub studio_weights: BTreeMap<String, WeightEntry>,
    pub category_weights: BTreeMap<String, WeightEntry>,
    pub avg_rating: f64,
    pub liked_item_count: u32,
}

impl PreferenceProfile {
    /// True for the zero profile built from a collection without liked items
    pub fn is_empty(&self) -> bool {
        self.liked_item_count == 0
    }
}
