use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    events::LoggedEvent,
    models::{DisplayMode, RenderedSentence, ScrollOffset, Viewport},
    scoring::ScoringClient,
    sensing::{loop_worker::mode_ticker, GazeSource, HandSource, SensingController, SessionClock},
    settings::ReaderSettings,
    text::split_into_sentences,
};

use super::{ReaderEvent, ReaderSession, SessionCommand, SessionSnapshot};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

const EVENT_BUFFER: usize = 1024;

/// Cloneable handle to a running session. State lives in a single consumer
/// task; this handle only sends commands and awaits replies.
#[derive(Clone)]
pub struct SessionController {
    commands: mpsc::Sender<SessionCommand>,
    events: broadcast::Sender<ReaderEvent>,
    sensing: Arc<Mutex<SensingController>>,
    scoring: ScoringClient,
    generation: Arc<AtomicU64>,
    clock: SessionClock,
    shutdown_token: CancellationToken,
    consumer: Arc<Mutex<Option<JoinHandle<()>>>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    scoring_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionController {
    /// Spawn the consumer and the time-in-mode ticker. Must be called inside a
    /// tokio runtime. Sensors are not touched until adaptive mode is entered.
    pub fn start(
        settings: ReaderSettings,
        gaze: Option<Box<dyn GazeSource>>,
        hand: Option<Box<dyn HandSource>>,
    ) -> Result<Self> {
        let scoring = ScoringClient::new(settings.scoring.clone())?;
        let (commands, receiver) = mpsc::channel(settings.sampling.channel_capacity.max(1));
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let session = ReaderSession::new(&settings);
        log_info!("session {} started", session.id());
        let consumer = tokio::spawn(run_session(session, receiver, events.clone()));

        let shutdown_token = CancellationToken::new();
        let ticker = tokio::spawn(mode_ticker(
            Duration::from_millis(settings.sampling.mode_tick_ms.max(1)),
            commands.clone(),
            shutdown_token.clone(),
        ));

        let sensing = SensingController::new(gaze, hand, settings.sampling, settings.gesture);

        Ok(Self {
            commands,
            events,
            sensing: Arc::new(Mutex::new(sensing)),
            scoring,
            generation: Arc::new(AtomicU64::new(0)),
            clock: SessionClock::new(),
            shutdown_token,
            consumer: Arc::new(Mutex::new(Some(consumer))),
            ticker: Arc::new(Mutex::new(Some(ticker))),
            scoring_task: Arc::new(Mutex::new(None)),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReaderEvent> {
        self.events.subscribe()
    }

    pub fn clock(&self) -> SessionClock {
        self.clock
    }

    /// Switch presentation. Entering adaptive starts the sensors; leaving it
    /// stops them before the session resets, so no stale sample follows.
    pub async fn set_display_mode(&self, mode: DisplayMode) -> Result<()> {
        let mut sensing = self.sensing.lock().await;
        let t_ms = self.clock.now_ms();

        match mode {
            DisplayMode::Adaptive => {
                self.send(SessionCommand::SetDisplayMode { mode, t_ms }).await?;
                sensing
                    .start_sensing(self.clock, self.commands.clone())
                    .await?;
            }
            DisplayMode::Baseline => {
                sensing.stop_sensing().await?;
                self.send(SessionCommand::SetDisplayMode { mode, t_ms }).await?;
            }
        }
        Ok(())
    }

    /// Split and load a new document, then score it in the background.
    /// Scores for a superseded document are dropped by the session.
    pub async fn load_text(&self, text: &str) -> Result<usize> {
        let sentences = split_into_sentences(text);
        let count = sentences.len();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.send(SessionCommand::LoadText {
            generation,
            sentences: sentences.clone(),
        })
        .await?;

        let mut task_guard = self.scoring_task.lock().await;
        if let Some(handle) = task_guard.take() {
            handle.abort();
        }
        if sentences.is_empty() {
            return Ok(0);
        }

        let scoring = self.scoring.clone();
        let commands = self.commands.clone();
        *task_guard = Some(tokio::spawn(async move {
            let scored = scoring.get_sentence_scores(&sentences).await;
            if commands
                .send(SessionCommand::ScoresReady { generation, scored })
                .await
                .is_err()
            {
                log_error!("session stopped before scores for generation {generation} arrived");
            }
        }));

        Ok(count)
    }

    /// Wait for the in-flight scoring request, if any.
    pub async fn wait_for_scores(&self) -> Result<()> {
        let handle = self.scoring_task.lock().await.take();
        if let Some(handle) = handle {
            handle.await.context("scoring task failed to join")?;
        }
        Ok(())
    }

    pub async fn update_layout(
        &self,
        elements: Vec<RenderedSentence>,
        scroll: ScrollOffset,
    ) -> Result<()> {
        self.send(SessionCommand::UpdateLayout { elements, scroll })
            .await
    }

    pub async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
        self.send(SessionCommand::SetViewport(viewport)).await
    }

    pub async fn clear_logs(&self) -> Result<()> {
        self.send(SessionCommand::ClearLogs).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        self.request(SessionCommand::Snapshot).await
    }

    pub async fn export_sentences(&self) -> Result<String> {
        self.request(SessionCommand::ExportSentences).await
    }

    pub async fn export_metrics(&self) -> Result<String> {
        self.request(SessionCommand::ExportMetrics).await
    }

    pub async fn events(&self) -> Result<Vec<LoggedEvent>> {
        self.request(SessionCommand::Events).await
    }

    pub async fn events_csv(&self) -> Result<String> {
        self.request(SessionCommand::EventsCsv).await
    }

    /// Stop sensors and background tasks, then drain the consumer.
    pub async fn shutdown(&self) -> Result<()> {
        self.sensing.lock().await.stop_sensing().await?;
        self.shutdown_token.cancel();

        if let Some(handle) = self.scoring_task.lock().await.take() {
            handle.abort();
        }
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.await.context("mode ticker failed to join")?;
        }

        let consumer = self.consumer.lock().await.take();
        if let Some(handle) = consumer {
            // The consumer may already be gone if every sender was dropped.
            let _ = self.commands.send(SessionCommand::Shutdown).await;
            handle.await.context("session consumer failed to join")?;
        }
        log_info!("session shut down");
        Ok(())
    }

    async fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| anyhow!("session consumer has stopped"))
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> SessionCommand) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.send(make(reply)).await?;
        response
            .await
            .context("session consumer dropped the reply")
    }
}

async fn run_session(
    mut session: ReaderSession,
    mut commands: mpsc::Receiver<SessionCommand>,
    events: broadcast::Sender<ReaderEvent>,
) {
    while let Some(command) = commands.recv().await {
        if matches!(command, SessionCommand::Shutdown) {
            break;
        }
        for event in session.handle(command) {
            // No subscribers is fine; the session keeps running headless.
            let _ = events.send(event);
        }
    }
    log_info!("session {} consumer exiting", session.id());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::detect::fixtures;
    use crate::models::{GazeMode, GazePrediction, HandLandmarks};
    use crate::scoring::{FallbackStrategy, ScoringConfig};
    use crate::sensing::{ReplayGazeSource, ReplayHandSource};
    use async_trait::async_trait;

    fn offline_settings() -> ReaderSettings {
        let mut settings = ReaderSettings {
            scoring: ScoringConfig {
                endpoint: None,
                fallback: FallbackStrategy::Heuristic,
                ..ScoringConfig::default()
            },
            ..ReaderSettings::default()
        };
        settings.sampling.gaze_poll_ms = 5;
        settings.sampling.hand_frame_ms = 5;
        settings.sampling.mode_tick_ms = 20;
        settings
    }

    struct BrokenCamera;

    #[async_trait]
    impl GazeSource for BrokenCamera {
        async fn start(&mut self) -> Result<()> {
            Err(anyhow!("camera permission denied"))
        }

        async fn current_prediction(&mut self) -> Result<Option<GazePrediction>> {
            Ok(None)
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    #[tokio::test]
    async fn load_text_scores_in_background() {
        let controller = SessionController::start(offline_settings(), None, None).unwrap();
        let count = controller
            .load_text("First sentence here. Second one has 2 digits!  Third?")
            .await
            .unwrap();
        assert_eq!(count, 3);

        controller.wait_for_scores().await.unwrap();
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.sentence_count, 3);
        assert_eq!(snapshot.scores.len(), 3);

        let events = controller.events().await.unwrap();
        let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["textLoaded", "scoresLoaded"]);

        controller.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn replayed_palm_freezes_session() {
        let gaze = ReplayGazeSource::new(vec![Some(GazePrediction { x: 200.0, y: 400.0 }); 8]);
        let hand = ReplayHandSource::new(vec![Some(fixtures::open_palm()); 3]);

        let controller = SessionController::start(
            offline_settings(),
            Some(Box::new(gaze)),
            Some(Box::new(hand)),
        )
        .unwrap();
        let mut events = controller.subscribe();

        controller.set_display_mode(DisplayMode::Adaptive).await.unwrap();
        settle().await;

        let snapshot = controller.snapshot().await.unwrap();
        assert!(snapshot.frozen);
        assert_eq!(snapshot.gaze_mode, GazeMode::Freeze);
        assert_eq!(snapshot.metrics.gaze.gaze_samples, 8);

        let mut saw_freeze = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, ReaderEvent::FreezeChanged { frozen: true, .. }) {
                saw_freeze = true;
            }
        }
        assert!(saw_freeze);

        controller.set_display_mode(DisplayMode::Baseline).await.unwrap();
        let snapshot = controller.snapshot().await.unwrap();
        assert!(!snapshot.frozen);
        assert_eq!(snapshot.gaze_mode, GazeMode::Idle);

        let csv = controller.events_csv().await.unwrap();
        assert!(csv.contains("\"freeze\""));
        assert!(csv.contains("\"uiModeChange\""));

        controller.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn failed_sensor_is_reported_not_fatal() {
        let controller =
            SessionController::start(offline_settings(), Some(Box::new(BrokenCamera)), None)
                .unwrap();
        let mut events = controller.subscribe();

        controller.set_display_mode(DisplayMode::Adaptive).await.unwrap();
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.display_mode, DisplayMode::Adaptive);

        let mut reported = false;
        while let Ok(event) = events.try_recv() {
            if let ReaderEvent::SensorStatus { message, .. } = event {
                assert!(message.contains("camera permission denied"));
                reported = true;
            }
        }
        assert!(reported);

        controller.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn idle_session_accrues_no_time() {
        let hand: Vec<Option<HandLandmarks>> = Vec::new();
        let controller = SessionController::start(
            offline_settings(),
            None,
            Some(Box::new(ReplayHandSource::new(hand))),
        )
        .unwrap();
        controller.set_display_mode(DisplayMode::Adaptive).await.unwrap();
        settle().await;

        // No gaze input means the classifier never leaves idle.
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.metrics.time_in_mode.total_ms(), 0);

        controller.clear_logs().await.unwrap();
        let events = controller.events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "logsCleared");

        controller.shutdown().await.unwrap();
    }
}
