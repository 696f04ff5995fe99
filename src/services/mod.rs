pub mod candidates;
pub mod dedup;
pub mod profile;
pub mod providers;
pub mod reason;
pub mod recommendations;
pub mod scoring;

pub use candidates::CandidatePool;
pub use recommendations::{get_recommendations, RecommendationService, RecommendationSet};
