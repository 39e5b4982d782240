use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::{
    models::{DisplayMode, RenderedSentence, ScrollOffset},
    scoring::ScoringClient,
    sensing::Trace,
    session::SessionController,
    settings::{ReaderSettings, SettingsStore},
    text::split_into_sentences,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Extra time after the last trace entry so queued samples drain.
const REPLAY_TAIL_MS: u64 = 500;
const LINE_TOP_PX: f64 = 80.0;
const LINE_HEIGHT_PX: f64 = 32.0;
const LINE_WIDTH_PX: f64 = 720.0;

#[derive(Parser)]
#[command(name = "skimreader")]
#[command(about = "Gaze and gesture driven adaptive reader", long_about = None)]
pub struct Cli {
    /// Settings file (JSON); defaults are used when absent
    #[arg(short, long, value_name = "FILE", global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded sensor trace against a text in adaptive mode
    ///
    /// Writes the highlighted-sentence export, the metrics report, the event
    /// log as CSV and a final session snapshot into the output directory.
    Replay {
        /// JSON-lines trace of gaze and hand observations
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,

        /// Plain text to read
        #[arg(long, value_name = "FILE")]
        text: PathBuf,

        /// Rendered sentence boxes (JSON array); one line per sentence otherwise
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,

        /// Output directory for exports
        #[arg(long, value_name = "DIR", default_value = "skimreader-out")]
        out: PathBuf,

        /// How long to run; derived from the trace length when omitted
        #[arg(long)]
        duration_ms: Option<u64>,
    },

    /// Score the sentences of a text and print them as JSON
    Score {
        #[arg(long, value_name = "FILE")]
        text: PathBuf,
    },
}

#[derive(Serialize)]
struct ScoredSentence<'a> {
    index: usize,
    score: f64,
    sentence: &'a str,
}

pub async fn execute(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Commands::Replay {
            trace,
            text,
            layout,
            out,
            duration_ms,
        } => replay(settings, &trace, &text, layout.as_deref(), &out, duration_ms).await,
        Commands::Score { text } => score(settings, &text).await,
    }
}

fn load_settings(path: Option<&Path>) -> Result<ReaderSettings> {
    let settings = match path {
        Some(path) => SettingsStore::new(path.to_path_buf())?.get(),
        None => ReaderSettings::default(),
    };
    Ok(settings.with_env_overrides())
}

async fn replay(
    settings: ReaderSettings,
    trace_path: &Path,
    text_path: &Path,
    layout_path: Option<&Path>,
    out: &Path,
    duration_ms: Option<u64>,
) -> Result<()> {
    let text = std::fs::read_to_string(text_path)
        .with_context(|| format!("Failed to read text from {}", text_path.display()))?;
    let trace = Trace::load(trace_path)?;

    let duration = Duration::from_millis(duration_ms.unwrap_or_else(|| {
        let gaze_ms = trace.gaze.len() as u64 * settings.sampling.gaze_poll_ms;
        let hand_ms = trace.hand.len() as u64 * settings.sampling.hand_frame_ms;
        gaze_ms.max(hand_ms) + REPLAY_TAIL_MS
    }));
    log_info!(
        "replaying {} gaze and {} hand entries over {}ms",
        trace.gaze.len(),
        trace.hand.len(),
        duration.as_millis()
    );

    let (gaze, hand) = trace.into_sources();
    let controller = SessionController::start(settings, Some(Box::new(gaze)), Some(Box::new(hand)))?;

    let count = controller.load_text(&text).await?;
    controller.wait_for_scores().await?;

    let elements = match layout_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read layout from {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse layout {}", path.display()))?
        }
        None => stacked_lines(count),
    };
    controller
        .update_layout(elements, ScrollOffset::default())
        .await?;

    controller.set_display_mode(DisplayMode::Adaptive).await?;
    tokio::time::sleep(duration).await;

    let snapshot = controller.snapshot().await?;
    let sentences = controller.export_sentences().await?;
    let metrics = controller.export_metrics().await?;
    let csv = controller.events_csv().await?;

    controller.set_display_mode(DisplayMode::Baseline).await?;
    controller.shutdown().await?;

    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;
    write_file(&out.join("highlighted_sentences.txt"), &sentences)?;
    write_file(&out.join("session_logs.txt"), &metrics)?;
    write_file(&out.join("events.csv"), &csv)?;
    write_file(
        &out.join("snapshot.json"),
        &serde_json::to_string_pretty(&snapshot)?,
    )?;

    println!("{metrics}");
    println!("Exports written to {}", out.display());
    Ok(())
}

async fn score(settings: ReaderSettings, text_path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(text_path)
        .with_context(|| format!("Failed to read text from {}", text_path.display()))?;
    let sentences = split_into_sentences(&text);

    let client = ScoringClient::new(settings.scoring)?;
    let scored = client.get_sentence_scores(&sentences).await;

    let rows: Vec<ScoredSentence> = sentences
        .iter()
        .zip(&scored.scores)
        .enumerate()
        .map(|(index, (sentence, &score))| ScoredSentence {
            index,
            score,
            sentence,
        })
        .collect();

    let output = serde_json::json!({
        "source": scored.source.as_str(),
        "summary": scored.summary,
        "sentences": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One sentence per line, top to bottom.
fn stacked_lines(count: usize) -> Vec<RenderedSentence> {
    (0..count)
        .map(|i| {
            let top = LINE_TOP_PX + i as f64 * LINE_HEIGHT_PX;
            RenderedSentence {
                top,
                bottom: top + LINE_HEIGHT_PX - 8.0,
                left: 0.0,
                right: LINE_WIDTH_PX,
            }
        })
        .collect()
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_replay_arguments() {
        let cli = Cli::try_parse_from([
            "skimreader",
            "--settings",
            "reader.json",
            "replay",
            "--trace",
            "trace.jsonl",
            "--text",
            "article.txt",
            "--duration-ms",
            "3000",
        ])
        .unwrap();

        assert_eq!(cli.settings, Some(PathBuf::from("reader.json")));
        match cli.command {
            Commands::Replay {
                duration_ms, out, ..
            } => {
                assert_eq!(duration_ms, Some(3_000));
                assert_eq!(out, PathBuf::from("skimreader-out"));
            }
            Commands::Score { .. } => panic!("expected replay"),
        }
    }

    #[test]
    fn stacked_lines_do_not_overlap() {
        let lines = stacked_lines(3);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].bottom < lines[1].top);
        assert_eq!(lines[2].top, LINE_TOP_PX + 2.0 * LINE_HEIGHT_PX);
    }

    #[tokio::test]
    async fn replay_writes_exports() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = dir.path().join("article.txt");
        let trace_path = dir.path().join("trace.jsonl");
        let settings_path = dir.path().join("settings.json");
        let out = dir.path().join("out");

        std::fs::write(&text_path, "One idea here. Another idea follows. A third closes it.").unwrap();
        std::fs::write(
            &trace_path,
            "{\"gaze\": {\"x\": 100.0, \"y\": 92.0}}\n{\"gaze\": {\"x\": 100.0, \"y\": 156.0}}\n",
        )
        .unwrap();
        std::fs::write(
            &settings_path,
            r#"{ "scoring": { "endpoint": null }, "sampling": { "gaze_poll_ms": 10 } }"#,
        )
        .unwrap();

        let settings = load_settings(Some(&settings_path)).unwrap();
        replay(settings, &trace_path, &text_path, None, &out, Some(200))
            .await
            .unwrap();

        let sentences = std::fs::read_to_string(out.join("highlighted_sentences.txt")).unwrap();
        assert!(sentences.starts_with("Export Sentences (unique highlighted)\nCount: 3"));
        let csv = std::fs::read_to_string(out.join("events.csv")).unwrap();
        assert!(csv.contains("\"modeChange\""));
        assert!(out.join("snapshot.json").exists());
        assert!(out.join("session_logs.txt").exists());
    }
}
