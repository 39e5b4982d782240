//! Append-only session event log.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One logged event. Freeform metadata is flattened next to the timestamp and
/// type when serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedEvent {
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionLog {
    events: Vec<LoggedEvent>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event stamped with the current wall clock. `data` should be a
    /// JSON object; any other value is stored under `value`.
    pub fn log(&mut self, event_type: &str, data: Value) {
        self.log_at(Utc::now().timestamp_millis(), event_type, data);
    }

    pub fn log_at(&mut self, timestamp: i64, event_type: &str, data: Value) {
        let data = match data {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        self.events.push(LoggedEvent {
            timestamp,
            event_type: event_type.to_string(),
            data,
        });
    }

    /// A copy of the log; callers never see the live list.
    pub fn events(&self) -> Vec<LoggedEvent> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Comma-separated export. The header is `timestamp,type` followed by every
    /// other key in first-seen order; each cell is the JSON encoding of its
    /// value, with `""` for keys an event does not carry.
    pub fn to_csv(&self) -> String {
        if self.events.is_empty() {
            return "timestamp,type\n".to_string();
        }

        let mut headers: Vec<String> = vec!["timestamp".into(), "type".into()];
        for event in &self.events {
            for key in event.data.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        let empty = Value::String(String::new());
        let mut lines = Vec::with_capacity(self.events.len() + 1);
        lines.push(headers.join(","));

        for event in &self.events {
            let row: Vec<String> = headers
                .iter()
                .map(|header| match header.as_str() {
                    "timestamp" => event.timestamp.to_string(),
                    "type" => Value::String(event.event_type.clone()).to_string(),
                    key => event.data.get(key).unwrap_or(&empty).to_string(),
                })
                .collect();
            lines.push(row.join(","));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_log_has_bare_header() {
        assert_eq!(SessionLog::new().to_csv(), "timestamp,type\n");
    }

    #[test]
    fn csv_header_is_union_of_keys() {
        let mut log = SessionLog::new();
        log.log_at(1_000, "uiModeChange", json!({ "uiMode": "adaptive" }));
        log.log_at(2_000, "freeze", json!({ "source": "gesture", "gesture": "palm" }));
        log.log_at(3_000, "logsCleared", json!({}));

        let csv = log.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,type,uiMode,source,gesture");
        assert_eq!(lines[1], r#"1000,"uiModeChange","adaptive","","""#);
        assert_eq!(lines[2], r#"2000,"freeze","","gesture","palm""#);
        assert_eq!(lines[3], r#"3000,"logsCleared","","","""#);
    }

    #[test]
    fn events_returns_a_copy() {
        let mut log = SessionLog::new();
        log.log_at(1, "modeChange", json!({ "mode": "reading" }));

        let mut copy = log.events();
        copy.clear();
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn serializes_flat() {
        let mut log = SessionLog::new();
        log.log_at(5, "modeChange", json!({ "mode": "skimming" }));
        let value = serde_json::to_value(&log.events()[0]).unwrap();
        assert_eq!(value, json!({ "timestamp": 5, "type": "modeChange", "mode": "skimming" }));
    }
}
