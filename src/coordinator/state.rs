use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::json;

use crate::{
    events::SessionLog,
    gesture::FreezeTrigger,
    metrics::{GazeMetrics, MetricsCollector},
    models::{DisplayMode, GazeMode},
    scoring::ScoredText,
};

use super::select_top_k;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// The parts of coordinator state a presentation layer redraws from.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorView {
    pub displayed_mode: GazeMode,
    pub frozen: bool,
    pub highlights: Vec<usize>,
}

/// Single owner of display mode, freeze, highlights, metrics and the event
/// log. Every mutation re-derives the highlight set.
#[derive(Debug, Clone)]
pub struct ModeCoordinator {
    top_k: usize,
    display_mode: DisplayMode,
    committed_mode: GazeMode,
    displayed_mode: GazeMode,
    frozen: bool,
    freeze_trigger: Option<FreezeTrigger>,
    sentences: Vec<String>,
    scores: Vec<f64>,
    summary: String,
    highlights: Vec<usize>,
    ever_highlighted: BTreeSet<usize>,
    metrics: MetricsCollector,
    log: SessionLog,
}

impl ModeCoordinator {
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            display_mode: DisplayMode::default(),
            committed_mode: GazeMode::Idle,
            displayed_mode: GazeMode::Idle,
            frozen: false,
            freeze_trigger: None,
            sentences: Vec::new(),
            scores: Vec::new(),
            summary: String::new(),
            highlights: Vec::new(),
            ever_highlighted: BTreeSet::new(),
            metrics: MetricsCollector::new(),
            log: SessionLog::new(),
        }
    }

    pub fn view(&self) -> CoordinatorView {
        CoordinatorView {
            displayed_mode: self.displayed_mode,
            frozen: self.frozen,
            highlights: self.highlights.clone(),
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn committed_mode(&self) -> GazeMode {
        self.committed_mode
    }

    pub fn displayed_mode(&self) -> GazeMode {
        self.displayed_mode
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn freeze_trigger(&self) -> Option<&FreezeTrigger> {
        self.freeze_trigger.as_ref()
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn highlights(&self) -> &[usize] {
        &self.highlights
    }

    pub fn ever_highlighted(&self) -> &BTreeSet<usize> {
        &self.ever_highlighted
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn record_gaze_metrics(&mut self, metrics: GazeMetrics) {
        self.metrics.record_gaze(metrics);
    }

    /// A new debounced classifier mode. Ignored for display while frozen.
    pub fn on_classifier_commit(&mut self, mode: GazeMode) {
        self.committed_mode = mode;
        if self.frozen {
            log_debug!("classifier committed {mode} while frozen; display unchanged");
            return;
        }
        self.displayed_mode = mode;
        self.log.log("modeChange", json!({ "mode": mode.as_str() }));
        self.refresh_highlights();
    }

    /// Apply a freeze change. Returns false when `frozen` matches the
    /// current state.
    pub fn set_frozen(&mut self, frozen: bool, trigger: FreezeTrigger) -> bool {
        if self.frozen == frozen {
            return false;
        }

        let event_type = if frozen { "freeze" } else { "unfreeze" };
        self.log.log(
            event_type,
            json!({
                "source": trigger.source,
                "gesture": trigger.gesture.map(|g| g.as_str()),
            }),
        );
        log_info!("{event_type} via {}", trigger.source);

        self.frozen = frozen;
        self.freeze_trigger = frozen.then_some(trigger);
        self.displayed_mode = if frozen {
            GazeMode::Freeze
        } else {
            self.committed_mode
        };
        self.refresh_highlights();
        true
    }

    /// Switch presentation. Any switch resets the gaze mode to idle and clears
    /// highlights; leaving adaptive also releases a freeze.
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.log.log("uiModeChange", json!({ "uiMode": mode.as_str() }));
        log_info!("display mode -> {}", mode.as_str());

        self.display_mode = mode;
        self.committed_mode = GazeMode::Idle;
        self.displayed_mode = GazeMode::Idle;
        self.highlights.clear();
        if mode != DisplayMode::Adaptive {
            self.frozen = false;
            self.freeze_trigger = None;
        }
        self.refresh_highlights();
    }

    /// Credit `period` to the committed classifier mode. Frozen time counts
    /// toward whatever mode was committed when the freeze began.
    pub fn tick(&mut self, period: Duration) {
        self.metrics.accrue(self.committed_mode, period);
    }

    /// Replace the document. Scores arrive later via [`Self::apply_scores`].
    pub fn load_sentences(&mut self, sentences: Vec<String>) {
        self.log
            .log("textLoaded", json!({ "sentences": sentences.len() }));
        self.sentences = sentences;
        self.scores.clear();
        self.summary.clear();
        self.highlights.clear();
        self.ever_highlighted.clear();
        self.refresh_highlights();
    }

    pub fn apply_scores(&mut self, scored: ScoredText) {
        if scored.scores.len() != self.sentences.len() {
            log_debug!(
                "dropping {} scores for {} sentences",
                scored.scores.len(),
                self.sentences.len()
            );
            return;
        }
        self.log.log(
            "scoresLoaded",
            json!({ "source": scored.source.as_str(), "count": scored.scores.len() }),
        );
        self.scores = scored.scores;
        self.summary = scored.summary;
        self.refresh_highlights();
    }

    /// Reset metrics, the log, freeze and highlights, then record the clear
    /// itself so the fresh log is never empty.
    pub fn clear_logs(&mut self) {
        self.log.clear();
        self.metrics.reset();
        self.committed_mode = GazeMode::Idle;
        self.displayed_mode = GazeMode::Idle;
        self.frozen = false;
        self.freeze_trigger = None;
        self.highlights.clear();
        self.ever_highlighted.clear();
        self.log.log("logsCleared", json!({}));
        self.refresh_highlights();
    }

    /// Deactivation: forget the run and the freeze but keep counters and the
    /// log.
    pub fn reset_run(&mut self) {
        self.committed_mode = GazeMode::Idle;
        self.displayed_mode = GazeMode::Idle;
        self.frozen = false;
        self.freeze_trigger = None;
        self.highlights.clear();
    }

    fn refresh_highlights(&mut self) {
        let next = if self.display_mode != DisplayMode::Adaptive {
            Vec::new()
        } else if self.frozen {
            if self.highlights.is_empty() {
                self.top_k()
            } else {
                return;
            }
        } else if self.committed_mode == GazeMode::Skimming {
            self.top_k()
        } else {
            Vec::new()
        };
        self.set_highlights(next);
    }

    fn top_k(&self) -> Vec<usize> {
        select_top_k(&self.scores, self.top_k)
    }

    fn set_highlights(&mut self, highlights: Vec<usize>) {
        let count = self.sentences.len();
        let highlights: Vec<usize> = highlights.into_iter().filter(|&i| i < count).collect();
        self.ever_highlighted.extend(highlights.iter().copied());
        self.highlights = highlights;
    }
}
