use std::time::Duration;

use serde::Serialize;
use tokio::sync::oneshot;

use crate::{
    events::LoggedEvent,
    gesture::{FreezeTrigger, Gesture, GestureStatus},
    metrics::{GazeMetrics, MetricsSnapshot},
    models::{DisplayMode, GazeMode, GazeSample, RenderedSentence, ScrollOffset, Viewport},
    scoring::{ScoreSource, ScoredText},
    sensing::SensorKind,
};

/// Everything that can change session state. Producers and the controller
/// handle only ever send these; the consumer task applies them in order.
#[derive(Debug)]
pub enum SessionCommand {
    Gaze(GazeSample),
    HandFrame {
        gesture: Option<Gesture>,
        hand_present: bool,
        t_ms: f64,
    },
    Tick(Duration),
    SensorStatus {
        sensor: SensorKind,
        message: String,
    },
    SetDisplayMode {
        mode: DisplayMode,
        t_ms: f64,
    },
    LoadText {
        generation: u64,
        sentences: Vec<String>,
    },
    ScoresReady {
        generation: u64,
        scored: ScoredText,
    },
    UpdateLayout {
        elements: Vec<RenderedSentence>,
        scroll: ScrollOffset,
    },
    SetViewport(Viewport),
    ClearLogs,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    ExportSentences(oneshot::Sender<String>),
    ExportMetrics(oneshot::Sender<String>),
    Events(oneshot::Sender<Vec<LoggedEvent>>),
    EventsCsv(oneshot::Sender<String>),
    Shutdown,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReaderEvent {
    DisplayModeChanged { mode: DisplayMode },
    ModeChanged { mode: GazeMode },
    FreezeChanged {
        frozen: bool,
        trigger: Option<FreezeTrigger>,
    },
    HighlightsChanged { highlights: Vec<usize> },
    MetricsUpdated { metrics: GazeMetrics },
    GazeSampled(GazeReadout),
    Scroll { delta: f64 },
    GestureStatusChanged(GestureStatus),
    SensorStatus { sensor: SensorKind, message: String },
    ScoresLoaded { source: ScoreSource, count: usize },
    LogsCleared,
}

/// Latest gaze position with the sentence under it, for the debug readout.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GazeReadout {
    pub x: f64,
    pub y: f64,
    pub t_ms: f64,
    pub line: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub display_mode: DisplayMode,
    pub gaze_mode: GazeMode,
    pub classifier_mode: GazeMode,
    pub frozen: bool,
    pub freeze_trigger: Option<FreezeTrigger>,
    pub highlights: Vec<usize>,
    pub ever_highlighted: Vec<usize>,
    pub sentence_count: usize,
    pub scores: Vec<f64>,
    pub summary: String,
    pub metrics: MetricsSnapshot,
    pub gesture: GestureStatus,
    pub last_gaze: Option<GazeReadout>,
    pub event_count: usize,
}
