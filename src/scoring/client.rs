use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{heuristic_scores, overlap_scores, truncate_chars, FallbackStrategy, ScoringConfig};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Failures at the remote boundary. Never surfaced past
/// [`ScoringClient::get_sentence_scores`].
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("no scoring endpoint configured")]
    Disabled,
    #[error("scoring request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("scoring endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed scoring response: {0}")]
    Malformed(String),
    #[error("expected {expected} scores, got {actual}")]
    LengthMismatch {
        expected: usize,
        actual: usize,
        summary: String,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScoreSource {
    Remote,
    Heuristic,
    Overlap,
}

impl ScoreSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreSource::Remote => "remote",
            ScoreSource::Heuristic => "heuristic",
            ScoreSource::Overlap => "overlap",
        }
    }
}

/// Importance scores aligned 1:1 with the input sentences.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredText {
    pub scores: Vec<f64>,
    pub summary: String,
    pub source: ScoreSource,
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    sentences: &'a [String],
}

#[derive(Deserialize)]
struct SummarizeResponse {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    scores: Option<Vec<f64>>,
}

#[derive(Clone)]
pub struct ScoringClient {
    http: reqwest::Client,
    config: ScoringConfig,
}

impl ScoringClient {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("failed to build scoring HTTP client")?;
        Ok(Self { http, config })
    }

    /// Scores for `sentences`, from the remote service when it answers with a
    /// correctly sized array, otherwise from the local fallback.
    pub async fn get_sentence_scores(&self, sentences: &[String]) -> ScoredText {
        let text = sentences.join(" ");

        match self.fetch_remote(&text, sentences).await {
            Ok((scores, summary)) => {
                log_info!("remote scores received for {} sentences", scores.len());
                ScoredText {
                    scores,
                    summary,
                    source: ScoreSource::Remote,
                }
            }
            Err(err) => {
                let summary = match &err {
                    ScoringError::LengthMismatch { summary, .. } => summary.clone(),
                    _ => String::new(),
                };
                if !matches!(err, ScoringError::Disabled) {
                    log_warn!("scoring service unavailable, using local fallback: {err}");
                }
                self.fallback(&text, sentences, summary)
            }
        }
    }

    async fn fetch_remote(
        &self,
        text: &str,
        sentences: &[String],
    ) -> Result<(Vec<f64>, String), ScoringError> {
        let endpoint = self.config.endpoint.as_deref().ok_or(ScoringError::Disabled)?;

        let response = self
            .http
            .post(endpoint)
            .json(&SummarizeRequest { text, sentences })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Status(status));
        }

        let body: SummarizeResponse = response
            .json()
            .await
            .map_err(|err| ScoringError::Malformed(err.to_string()))?;
        let summary = body.summary.unwrap_or_default();
        let scores = body
            .scores
            .ok_or_else(|| ScoringError::Malformed("missing scores".into()))?;

        if scores.len() != sentences.len() {
            return Err(ScoringError::LengthMismatch {
                expected: sentences.len(),
                actual: scores.len(),
                summary,
            });
        }

        Ok((scores, summary))
    }

    fn fallback(&self, text: &str, sentences: &[String], summary: String) -> ScoredText {
        match self.config.fallback {
            FallbackStrategy::Heuristic => ScoredText {
                scores: heuristic_scores(sentences),
                summary,
                source: ScoreSource::Heuristic,
            },
            FallbackStrategy::Overlap => {
                let reference = if summary.trim().is_empty() {
                    truncate_chars(text, self.config.truncate_chars).to_string()
                } else {
                    summary.clone()
                };
                ScoredText {
                    scores: overlap_scores(sentences, &reference),
                    summary,
                    source: ScoreSource::Overlap,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn sentences() -> Vec<String> {
        vec![
            "Gaze tracking estimates where people look.".to_string(),
            "Skimming involves 3 kinds of rapid movement.".to_string(),
            "Readers revisit earlier lines.".to_string(),
        ]
    }

    /// Serves one canned HTTP response and returns the endpoint URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}/api/summarize")
    }

    fn client(endpoint: Option<String>, fallback: FallbackStrategy) -> ScoringClient {
        ScoringClient::new(ScoringConfig {
            endpoint,
            timeout_ms: 2_000,
            fallback,
            ..ScoringConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn uses_remote_scores_when_aligned() {
        let endpoint = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"summary":"people look","scores":[0.9,0.2,0.4]}"#,
        )
        .await;
        let scored = client(Some(endpoint), FallbackStrategy::Heuristic)
            .get_sentence_scores(&sentences())
            .await;

        assert_eq!(scored.source, ScoreSource::Remote);
        assert_eq!(scored.scores, vec![0.9, 0.2, 0.4]);
        assert_eq!(scored.summary, "people look");
    }

    #[tokio::test]
    async fn length_mismatch_falls_back_and_keeps_summary() {
        let endpoint = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"summary":"readers revisit earlier lines","scores":[0.9]}"#,
        )
        .await;
        let scored = client(Some(endpoint), FallbackStrategy::Overlap)
            .get_sentence_scores(&sentences())
            .await;

        assert_eq!(scored.source, ScoreSource::Overlap);
        assert_eq!(scored.summary, "readers revisit earlier lines");
        assert_eq!(scored.scores.len(), 3);
        assert_eq!(scored.scores[2], 1.0);
    }

    #[tokio::test]
    async fn server_error_falls_back_to_heuristic() {
        let endpoint = serve_once("HTTP/1.1 500 Internal Server Error", r#"{"error":"x"}"#).await;
        let scored = client(Some(endpoint), FallbackStrategy::Heuristic)
            .get_sentence_scores(&sentences())
            .await;

        assert_eq!(scored.source, ScoreSource::Heuristic);
        assert_eq!(scored.scores, heuristic_scores(&sentences()));
    }

    #[tokio::test]
    async fn unreachable_service_still_scores_every_sentence() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let scored = client(
            Some(format!("http://{addr}/api/summarize")),
            FallbackStrategy::Heuristic,
        )
        .get_sentence_scores(&sentences())
        .await;

        assert_eq!(scored.scores.len(), sentences().len());
        assert!(scored.scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[tokio::test]
    async fn disabled_endpoint_overlaps_truncated_text() {
        let scored = client(None, FallbackStrategy::Overlap)
            .get_sentence_scores(&sentences())
            .await;

        assert_eq!(scored.source, ScoreSource::Overlap);
        // The whole text fits in 500 chars, so every sentence overlaps fully.
        assert_eq!(scored.scores, vec![1.0, 1.0, 1.0]);
    }
}
