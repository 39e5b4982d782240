use chrono::Utc;
use uuid::Uuid;

use crate::{
    classifier::GazeClassifier,
    coordinator::ModeCoordinator,
    export::{export_metrics_report, export_sentences},
    gesture::{FreezeController, Gesture},
    layout::{map_contained, SentenceRectIndex},
    models::{DisplayMode, GazeSample, Viewport},
    scoring::ScoredText,
    scroll::{compute_scroll_delta, ScrollConfig},
    settings::ReaderSettings,
};

use super::{GazeReadout, ReaderEvent, SessionCommand, SessionSnapshot};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Synchronous session state. Owned by exactly one consumer task; every
/// mutation goes through [`ReaderSession::handle`].
pub struct ReaderSession {
    id: String,
    classifier: GazeClassifier,
    freeze: FreezeController,
    coordinator: ModeCoordinator,
    rects: SentenceRectIndex,
    viewport: Viewport,
    scroll: ScrollConfig,
    generation: u64,
    last_gaze: Option<GazeReadout>,
}

impl ReaderSession {
    pub fn new(settings: &ReaderSettings) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            classifier: GazeClassifier::new(settings.classifier.clone()),
            freeze: FreezeController::new(settings.gesture.clone()),
            coordinator: ModeCoordinator::new(settings.scoring.top_k),
            rects: SentenceRectIndex::new(),
            viewport: Viewport::default(),
            scroll: settings.scroll.clone(),
            generation: 0,
            last_gaze: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn coordinator(&self) -> &ModeCoordinator {
        &self.coordinator
    }

    /// Apply one command and return the notifications it produced, in order.
    pub fn handle(&mut self, command: SessionCommand) -> Vec<ReaderEvent> {
        let mut events = Vec::new();

        match command {
            SessionCommand::Gaze(sample) => self.on_gaze(sample, &mut events),
            SessionCommand::HandFrame {
                gesture,
                hand_present,
                t_ms,
            } => self.on_hand_frame(gesture, hand_present, t_ms, &mut events),
            SessionCommand::Tick(period) => self.coordinator.tick(period),
            SessionCommand::SensorStatus { sensor, message } => {
                events.push(ReaderEvent::SensorStatus { sensor, message });
            }
            SessionCommand::SetDisplayMode { mode, t_ms } => {
                self.set_display_mode(mode, t_ms, &mut events)
            }
            SessionCommand::LoadText {
                generation,
                sentences,
            } => {
                log_info!("text loaded: {} sentences (generation {generation})", sentences.len());
                self.generation = generation;
                self.rects.clear();
                self.track(&mut events, |s| s.coordinator.load_sentences(sentences));
            }
            SessionCommand::ScoresReady { generation, scored } => {
                self.on_scores(generation, scored, &mut events)
            }
            SessionCommand::UpdateLayout { elements, scroll } => {
                self.rects.rebuild(&elements, scroll);
                self.viewport.scroll = scroll;
            }
            SessionCommand::SetViewport(viewport) => self.viewport = viewport,
            SessionCommand::ClearLogs => self.clear_logs(&mut events),
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            SessionCommand::ExportSentences(reply) => {
                let _ = reply.send(export_sentences(
                    self.coordinator.sentences(),
                    self.coordinator.ever_highlighted(),
                ));
            }
            SessionCommand::ExportMetrics(reply) => {
                let _ = reply.send(export_metrics_report(
                    self.coordinator.displayed_mode(),
                    &self.coordinator.metrics().get_snapshot(),
                    Utc::now(),
                ));
            }
            SessionCommand::Events(reply) => {
                let _ = reply.send(self.coordinator.log().events());
            }
            SessionCommand::EventsCsv(reply) => {
                let _ = reply.send(self.coordinator.log().to_csv());
            }
            SessionCommand::Shutdown => {}
        }

        events
    }

    fn on_gaze(&mut self, sample: GazeSample, events: &mut Vec<ReaderEvent>) {
        if self.coordinator.display_mode() != DisplayMode::Adaptive {
            log_debug!("dropping gaze sample outside adaptive mode");
            return;
        }
        let frozen = self.coordinator.is_frozen();

        if let Some(delta) =
            compute_scroll_delta(&self.scroll, Some(sample.y), &self.viewport, true, frozen)
        {
            events.push(ReaderEvent::Scroll { delta });
        }

        let rects = self.rects.snapshot();
        let output = self.classifier.process(sample, &rects, frozen);
        self.coordinator.record_gaze_metrics(output.metrics);
        events.push(ReaderEvent::MetricsUpdated {
            metrics: output.metrics,
        });

        let readout = GazeReadout {
            x: sample.x,
            y: sample.y,
            t_ms: sample.t_ms,
            line: map_contained(&rects, sample.y, self.viewport.scroll.y),
        };
        self.last_gaze = Some(readout);
        events.push(ReaderEvent::GazeSampled(readout));

        if let Some(mode) = output.committed {
            self.track(events, |s| s.coordinator.on_classifier_commit(mode));
        }
    }

    fn on_hand_frame(
        &mut self,
        gesture: Option<Gesture>,
        hand_present: bool,
        t_ms: f64,
        events: &mut Vec<ReaderEvent>,
    ) {
        if self.coordinator.display_mode() != DisplayMode::Adaptive {
            return;
        }

        let outcome = self.freeze.observe(gesture, hand_present, t_ms);
        if let Some(status) = outcome.status {
            events.push(ReaderEvent::GestureStatusChanged(status));
        }
        if let Some(transition) = outcome.transition {
            self.track(events, |s| {
                s.coordinator
                    .set_frozen(transition.frozen, transition.trigger);
            });
        }
    }

    fn set_display_mode(&mut self, mode: DisplayMode, t_ms: f64, events: &mut Vec<ReaderEvent>) {
        self.classifier.reset_run();
        self.freeze.reset();
        self.last_gaze = None;
        self.track(events, |s| s.coordinator.set_display_mode(mode));
        events.push(ReaderEvent::DisplayModeChanged { mode });

        if mode == DisplayMode::Adaptive {
            if let Some(status) = self.freeze.announce_ready(t_ms) {
                events.push(ReaderEvent::GestureStatusChanged(status));
            }
        }
    }

    fn on_scores(&mut self, generation: u64, scored: ScoredText, events: &mut Vec<ReaderEvent>) {
        if generation != self.generation {
            log_debug!(
                "discarding scores for generation {generation} (current {})",
                self.generation
            );
            return;
        }

        let source = scored.source;
        let count = scored.scores.len();
        if count != self.coordinator.sentences().len() {
            log_debug!("discarding {count} scores for a different sentence count");
            return;
        }

        self.track(events, |s| s.coordinator.apply_scores(scored));
        events.push(ReaderEvent::ScoresLoaded { source, count });
    }

    fn clear_logs(&mut self, events: &mut Vec<ReaderEvent>) {
        self.classifier.clear();
        self.freeze.release();
        self.track(events, |s| s.coordinator.clear_logs());
        events.push(ReaderEvent::MetricsUpdated {
            metrics: self.coordinator.metrics().gaze(),
        });
        events.push(ReaderEvent::LogsCleared);
    }

    /// Run `apply` and report whichever parts of the displayed state changed.
    fn track<F: FnOnce(&mut Self)>(&mut self, events: &mut Vec<ReaderEvent>, apply: F) {
        let before = self.coordinator.view();
        apply(self);
        let after = self.coordinator.view();

        if before.displayed_mode != after.displayed_mode {
            events.push(ReaderEvent::ModeChanged {
                mode: after.displayed_mode,
            });
        }
        if before.frozen != after.frozen {
            events.push(ReaderEvent::FreezeChanged {
                frozen: after.frozen,
                trigger: self.coordinator.freeze_trigger().cloned(),
            });
        }
        if before.highlights != after.highlights {
            events.push(ReaderEvent::HighlightsChanged {
                highlights: after.highlights,
            });
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let coordinator = &self.coordinator;
        SessionSnapshot {
            session_id: self.id.clone(),
            display_mode: coordinator.display_mode(),
            gaze_mode: coordinator.displayed_mode(),
            classifier_mode: self.classifier.current_mode(),
            frozen: coordinator.is_frozen(),
            freeze_trigger: coordinator.freeze_trigger().cloned(),
            highlights: coordinator.highlights().to_vec(),
            ever_highlighted: coordinator.ever_highlighted().iter().copied().collect(),
            sentence_count: coordinator.sentences().len(),
            scores: coordinator.scores().to_vec(),
            summary: coordinator.summary().to_string(),
            metrics: coordinator.metrics().get_snapshot(),
            gesture: self.freeze.status(),
            last_gaze: self.last_gaze,
            event_count: coordinator.log().len(),
        }
    }
}
