use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    gesture::{detect_gesture, GestureConfig},
    models::GazeSample,
    session::SessionCommand,
};

use super::{GazeSource, HandSource, SamplingConfig, SessionClock};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Poll the gaze estimator until cancelled. Hands the source back so a later
/// activation can reuse it.
pub async fn gaze_loop(
    mut source: Box<dyn GazeSource>,
    clock: SessionClock,
    sampling: SamplingConfig,
    commands: mpsc::Sender<SessionCommand>,
    cancel_token: CancellationToken,
) -> Box<dyn GazeSource> {
    let mut ticker = tokio::time::interval(Duration::from_millis(sampling.gaze_poll_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let timeout = Duration::from_millis(sampling.sensor_timeout_ms);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match tokio::time::timeout(timeout, source.current_prediction()).await {
                    Ok(Ok(Some(prediction))) => {
                        let sample = GazeSample::new(prediction.x, prediction.y, clock.now_ms());
                        if !forward(&commands, SessionCommand::Gaze(sample), &cancel_token).await {
                            break;
                        }
                    }
                    Ok(Ok(None)) => {}
                    Ok(Err(err)) => log_warn!("gaze estimate failed: {err:?}"),
                    Err(_) => log_warn!("gaze estimate timeout (> {}ms)", sampling.sensor_timeout_ms),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("gaze loop shutting down");
                break;
            }
        }
    }

    source.stop().await;
    source
}

/// Run hand detection frame by frame. Gesture recognition happens here so
/// only the verdict crosses the channel.
pub async fn hand_loop(
    mut source: Box<dyn HandSource>,
    clock: SessionClock,
    sampling: SamplingConfig,
    gesture: GestureConfig,
    commands: mpsc::Sender<SessionCommand>,
    cancel_token: CancellationToken,
) -> Box<dyn HandSource> {
    let mut ticker = tokio::time::interval(Duration::from_millis(sampling.hand_frame_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let timeout = Duration::from_millis(sampling.sensor_timeout_ms);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = match tokio::time::timeout(timeout, source.next_frame()).await {
                    Ok(Ok(frame)) => frame,
                    Ok(Err(err)) => {
                        log_warn!("hand detection failed: {err:?}");
                        continue;
                    }
                    Err(_) => {
                        log_warn!("hand detection timeout (> {}ms)", sampling.sensor_timeout_ms);
                        continue;
                    }
                };

                let command = SessionCommand::HandFrame {
                    gesture: frame.as_ref().and_then(|hand| detect_gesture(hand, &gesture)),
                    hand_present: frame.is_some(),
                    t_ms: clock.now_ms(),
                };
                if !forward(&commands, command, &cancel_token).await {
                    break;
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("hand loop shutting down");
                break;
            }
        }
    }

    source.stop().await;
    source
}

/// Emit a tick every `period` so the session can accrue time in mode.
pub async fn mode_ticker(
    period: Duration,
    commands: mpsc::Sender<SessionCommand>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; nothing has elapsed yet.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !forward(&commands, SessionCommand::Tick(period), &cancel_token).await {
                    break;
                }
            }
            _ = cancel_token.cancelled() => {
                log_debug!("mode ticker shutting down");
                break;
            }
        }
    }
}

/// Send unless cancelled first. Returns false when the loop should exit.
async fn forward(
    commands: &mpsc::Sender<SessionCommand>,
    command: SessionCommand,
    cancel_token: &CancellationToken,
) -> bool {
    tokio::select! {
        sent = commands.send(command) => {
            if sent.is_err() {
                log_debug!("session consumer gone; stopping producer");
            }
            sent.is_ok()
        }
        _ = cancel_token.cancelled() => false,
    }
}
