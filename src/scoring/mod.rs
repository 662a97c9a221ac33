pub mod compare;
pub mod config;
pub mod engine;
pub mod validation;

pub use compare::{compare, sort_listings, SortKey};
pub use config::*;
pub use engine::{compute_score, score_listing, ScoreResult, ScoredListing};
pub use validation::validate_scoring;
