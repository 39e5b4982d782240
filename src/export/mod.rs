//! Plain-text reports for a finished reading session.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{metrics::MetricsSnapshot, models::GazeMode};

/// Every sentence that was highlighted at least once, in document order.
/// Indices that no longer point into `sentences` are skipped.
pub fn export_sentences(sentences: &[String], ever_highlighted: &BTreeSet<usize>) -> String {
    let lines: Vec<String> = ever_highlighted
        .iter()
        .filter_map(|&i| sentences.get(i))
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(n, s)| format!("{}. {}", n + 1, s))
        .collect();

    let body = if lines.is_empty() {
        "No highlighted sentences yet.".to_string()
    } else {
        lines.join("\n\n")
    };

    format!(
        "Export Sentences (unique highlighted)\nCount: {}\n\n{}",
        lines.len(),
        body
    )
}

pub fn export_metrics_report(
    mode: GazeMode,
    metrics: &MetricsSnapshot,
    now: DateTime<Utc>,
) -> String {
    let time = &metrics.time_in_mode;
    let secs = |ms: u64| ms as f64 / 1000.0;

    format!(
        "Export Logs\n\
         Timestamp: {}\n\n\
         Current gaze mode: {}\n\
         Gaze samples: {}\n\
         Backward jumps: {}\n\n\
         Time reading (s): {:.1}\n\
         Time skimming (s): {:.1}\n\
         Time rereading (s): {:.1}\n\
         Total time (s): {:.1}\n",
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
        mode,
        metrics.gaze.gaze_samples,
        metrics.gaze.backward_jumps,
        secs(time.reading_ms),
        secs(time.skimming_ms),
        secs(time.rereading_ms),
        secs(time.total_ms()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{GazeMetrics, TimeInMode};
    use chrono::TimeZone;

    #[test]
    fn sentences_in_document_order() {
        let sentences: Vec<String> = ["First.", "Second.", "Third."]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ever: BTreeSet<usize> = [2, 0, 9].into_iter().collect();

        assert_eq!(
            export_sentences(&sentences, &ever),
            "Export Sentences (unique highlighted)\nCount: 2\n\n1. First.\n\n2. Third."
        );
    }

    #[test]
    fn nothing_highlighted() {
        assert_eq!(
            export_sentences(&[], &BTreeSet::new()),
            "Export Sentences (unique highlighted)\nCount: 0\n\nNo highlighted sentences yet."
        );
    }

    #[test]
    fn metrics_report_layout() {
        let snapshot = MetricsSnapshot {
            gaze: GazeMetrics {
                gaze_samples: 42,
                backward_jumps: 3,
            },
            time_in_mode: TimeInMode {
                reading_ms: 1_200,
                skimming_ms: 400,
                rereading_ms: 0,
            },
        };
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let report = export_metrics_report(GazeMode::Skimming, &snapshot, now);
        assert_eq!(
            report,
            "Export Logs\nTimestamp: 2024-05-01T12:00:00.000Z\n\n\
             Current gaze mode: skimming\nGaze samples: 42\nBackward jumps: 3\n\n\
             Time reading (s): 1.2\nTime skimming (s): 0.4\nTime rereading (s): 0.0\n\
             Total time (s): 1.6\n"
        );
    }
}
