use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{gesture::GestureConfig, session::SessionCommand};

use super::loop_worker::{gaze_loop, hand_loop};
use super::{GazeSource, HandSource, SamplingConfig, SensorKind, SessionClock};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Owns the sensor sources and the producer tasks that poll them. Sources
/// move into their task while sensing and come back on stop.
pub struct SensingController {
    gaze: Option<Box<dyn GazeSource>>,
    hand: Option<Box<dyn HandSource>>,
    gaze_handle: Option<JoinHandle<Box<dyn GazeSource>>>,
    hand_handle: Option<JoinHandle<Box<dyn HandSource>>>,
    cancel_token: Option<CancellationToken>,
    sampling: SamplingConfig,
    gesture: GestureConfig,
}

impl SensingController {
    pub fn new(
        gaze: Option<Box<dyn GazeSource>>,
        hand: Option<Box<dyn HandSource>>,
        sampling: SamplingConfig,
        gesture: GestureConfig,
    ) -> Self {
        Self {
            gaze,
            hand,
            gaze_handle: None,
            hand_handle: None,
            cancel_token: None,
            sampling,
            gesture,
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel_token.is_some()
    }

    /// Start whichever sources are available. A source that fails to start is
    /// reported on the command channel and kept for the next activation.
    pub async fn start_sensing(
        &mut self,
        clock: SessionClock,
        commands: mpsc::Sender<SessionCommand>,
    ) -> Result<()> {
        if self.is_active() {
            log_info!("sensing already active");
            return Ok(());
        }

        let cancel_token = CancellationToken::new();

        if let Some(mut source) = self.gaze.take() {
            match source.start().await {
                Ok(()) => {
                    self.gaze_handle = Some(tokio::spawn(gaze_loop(
                        source,
                        clock,
                        self.sampling.clone(),
                        commands.clone(),
                        cancel_token.clone(),
                    )));
                }
                Err(err) => {
                    self.gaze = Some(source);
                    report_failure(&commands, SensorKind::Gaze, &err).await;
                }
            }
        }

        if let Some(mut source) = self.hand.take() {
            match source.start().await {
                Ok(()) => {
                    self.hand_handle = Some(tokio::spawn(hand_loop(
                        source,
                        clock,
                        self.sampling.clone(),
                        self.gesture.clone(),
                        commands.clone(),
                        cancel_token.clone(),
                    )));
                }
                Err(err) => {
                    self.hand = Some(source);
                    report_failure(&commands, SensorKind::Hand, &err).await;
                }
            }
        }

        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the producers and wait for them so no sample lands after this
    /// returns.
    pub async fn stop_sensing(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.gaze_handle.take() {
            self.gaze = Some(handle.await.context("gaze loop task failed to join")?);
        }
        if let Some(handle) = self.hand_handle.take() {
            self.hand = Some(handle.await.context("hand loop task failed to join")?);
        }
        Ok(())
    }
}

async fn report_failure(
    commands: &mpsc::Sender<SessionCommand>,
    sensor: SensorKind,
    err: &anyhow::Error,
) {
    log_warn!("{} sensor unavailable: {err:?}", sensor.as_str());
    let _ = commands
        .send(SessionCommand::SensorStatus {
            sensor,
            message: format!("{} sensor unavailable: {err}", sensor.as_str()),
        })
        .await;
}
