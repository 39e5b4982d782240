pub mod client;
pub mod config;
pub mod heuristic;
pub mod overlap;

pub use client::{ScoreSource, ScoredText, ScoringClient, ScoringError};
pub use config::{FallbackStrategy, ScoringConfig};
pub use heuristic::heuristic_scores;
pub use overlap::{overlap_scores, truncate_chars};
