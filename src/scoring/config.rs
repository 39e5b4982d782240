use serde::{Deserialize, Serialize};

/// Local scorer used whenever the remote service cannot be used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FallbackStrategy {
    Heuristic,
    Overlap,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Summarization endpoint, e.g. `http://localhost:5001/api/summarize`.
    /// `None` always uses the fallback.
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
    pub fallback: FallbackStrategy,
    /// Reference length for the overlap fallback when no summary is available.
    pub truncate_chars: usize,
    /// Sentences highlighted while skimming or frozen.
    pub top_k: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: Some("http://localhost:5001/api/summarize".to_string()),
            timeout_ms: 8_000,
            fallback: FallbackStrategy::Heuristic,
            truncate_chars: 500,
            top_k: 5,
        }
    }
}
