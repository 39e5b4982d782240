use crate::{
    layout::map_nearest_center,
    metrics::GazeMetrics,
    models::{GazeMode, GazePoint, GazeSample, SentenceRect},
};

use super::{ClassifierConfig, ModeHistory};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Result of feeding one sample through the classifier.
///
/// `metrics` reflects this sample and must be published before `committed`
/// is acted on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOutput {
    pub point: GazePoint,
    pub metrics: GazeMetrics,
    /// Per-sample label; `None` for the first sample of a run.
    pub raw_mode: Option<GazeMode>,
    /// Set when the debounce gate committed a new mode on this sample.
    pub committed: Option<GazeMode>,
}

/// Turns the raw gaze stream into a debounced reading mode.
#[derive(Debug, Clone)]
pub struct GazeClassifier {
    config: ClassifierConfig,
    history: ModeHistory,
    previous: Option<GazePoint>,
    current_mode: GazeMode,
    last_switch_ms: Option<f64>,
    metrics: GazeMetrics,
}

impl GazeClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let history = ModeHistory::new(config.history_len);
        Self {
            config,
            history,
            previous: None,
            current_mode: GazeMode::Idle,
            last_switch_ms: None,
            metrics: GazeMetrics::default(),
        }
    }

    pub fn current_mode(&self) -> GazeMode {
        self.current_mode
    }

    pub fn metrics(&self) -> GazeMetrics {
        self.metrics
    }

    pub fn previous(&self) -> Option<GazePoint> {
        self.previous
    }

    pub fn history(&self) -> &ModeHistory {
        &self.history
    }

    /// Process one sample. While `frozen`, counters still advance and the
    /// history still fills, but no transition is committed.
    pub fn process(
        &mut self,
        sample: GazeSample,
        rects: &[SentenceRect],
        frozen: bool,
    ) -> ClassifierOutput {
        self.metrics.gaze_samples += 1;

        let point = GazePoint {
            sample,
            line_index: map_nearest_center(rects, sample.y),
        };

        if let Some(prev) = self.previous {
            if let (Some(prev_line), Some(line)) = (prev.line_index, point.line_index) {
                if line < prev_line {
                    self.metrics.backward_jumps += 1;
                }
            }
        }

        let metrics = self.metrics;

        let Some(prev) = self.previous else {
            self.previous = Some(point);
            return ClassifierOutput {
                point,
                metrics,
                raw_mode: None,
                committed: None,
            };
        };

        let raw_mode = classify_sample(&self.config, &prev, &point);
        self.history.push(raw_mode);

        let committed = if frozen {
            None
        } else {
            self.evaluate_transition(sample.t_ms)
        };

        self.previous = Some(point);

        ClassifierOutput {
            point,
            metrics,
            raw_mode: Some(raw_mode),
            committed,
        }
    }

    fn evaluate_transition(&mut self, now_ms: f64) -> Option<GazeMode> {
        let (majority, fraction) = self.history.majority()?;

        if majority == self.current_mode || fraction < self.config.mode_threshold {
            return None;
        }

        if let Some(last) = self.last_switch_ms {
            if now_ms - last < self.config.min_switch_interval_ms {
                log_debug!(
                    "holding {} -> {} ({:.0}ms since last switch)",
                    self.current_mode,
                    majority,
                    now_ms - last
                );
                return None;
            }
        }

        log_info!(
            "gaze mode {} -> {} ({:.0}% of last {})",
            self.current_mode,
            majority,
            fraction * 100.0,
            self.history.len()
        );
        self.current_mode = majority;
        self.last_switch_ms = Some(now_ms);
        Some(majority)
    }

    /// Forget the run (history, previous point, committed mode) but keep the
    /// sample counters.
    pub fn reset_run(&mut self) {
        self.history.clear();
        self.previous = None;
        self.current_mode = GazeMode::Idle;
        self.last_switch_ms = None;
    }

    /// Full reset including counters.
    pub fn clear(&mut self) {
        self.reset_run();
        self.metrics = GazeMetrics::default();
    }
}

/// Label one sample relative to its predecessor. First matching rule wins.
pub fn classify_sample(config: &ClassifierConfig, prev: &GazePoint, cur: &GazePoint) -> GazeMode {
    let dt_secs = ((cur.sample.t_ms - prev.sample.t_ms) / 1000.0).max(0.001);
    let dx = cur.sample.x - prev.sample.x;
    let dy = cur.sample.y - prev.sample.y;
    let dist = dx.hypot(dy);

    // A missing line on either side carries no directional signal.
    let line_delta = match (prev.line_index, cur.line_index) {
        (Some(prev_line), Some(line)) => Some(line as i64 - prev_line as i64),
        _ => None,
    };
    let fast = dt_secs < config.fast_window_secs;

    let forward = line_delta.is_some_and(|delta| delta >= 1) || dy > config.jump_px;
    let backward = line_delta.is_some_and(|delta| delta <= -1) || dy < -config.jump_px;

    if forward && fast {
        GazeMode::Skimming
    } else if backward && fast {
        GazeMode::Rereading
    } else if dist < config.idle_distance_px && dt_secs > config.idle_min_secs {
        GazeMode::Idle
    } else {
        GazeMode::Reading
    }
}
