use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::{
    classifier::ClassifierConfig, gesture::GestureConfig, scoring::ScoringConfig,
    scroll::ScrollConfig, sensing::SamplingConfig,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const SCORING_URL_ENV: &str = "SKIMREADER_SCORING_URL";
pub const DEBUG_ENV: &str = "SKIMREADER_DEBUG";

/// Every tunable of a reading session. Missing sections or fields fall back
/// to their defaults, so a settings file only needs the values it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ReaderSettings {
    pub sampling: SamplingConfig,
    pub classifier: ClassifierConfig,
    pub gesture: GestureConfig,
    pub scroll: ScrollConfig,
    pub scoring: ScoringConfig,
}

impl ReaderSettings {
    /// Apply environment overrides. An empty scoring URL disables the remote
    /// scorer.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SCORING_URL_ENV) {
            let url = url.trim();
            self.scoring.endpoint = if url.is_empty() {
                None
            } else {
                Some(url.to_string())
            };
        }
        self
    }
}

/// Whether verbose debug output was requested through the environment.
pub fn debug_mode() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ReaderSettings>,
}

impl SettingsStore {
    /// Load from `path`, or start from defaults when the file does not exist.
    /// An unreadable file is an error; a malformed one is replaced by
    /// defaults with a warning.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    log_warn!("ignoring malformed settings at {}: {err}", path.display());
                    ReaderSettings::default()
                }
            }
        } else {
            ReaderSettings::default()
        };

        log_info!("settings loaded from {}", path.display());
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> ReaderSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the settings and write them to disk.
    pub fn update(&self, settings: ReaderSettings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &ReaderSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory {}", parent.display())
                })?;
            }
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: ReaderSettings = serde_json::from_str(&contents)?;
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::FallbackStrategy;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.get(), ReaderSettings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "classifier": { "history_len": 8 }, "scoring": { "fallback": "overlap" } }"#,
        )
        .unwrap();

        let settings = SettingsStore::new(path).unwrap().get();
        assert_eq!(settings.classifier.history_len, 8);
        assert_eq!(settings.classifier.mode_threshold, 0.4);
        assert_eq!(settings.scoring.fallback, FallbackStrategy::Overlap);
        assert_eq!(settings.scroll, ScrollConfig::default());
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut settings = store.get();
        settings.gesture.cooldown_ms = 1_200.0;
        store.update(settings.clone()).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.get(), settings);
        reopened.reload().unwrap();
        assert_eq!(reopened.get().gesture.cooldown_ms, 1_200.0);
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(SettingsStore::new(path).unwrap().get(), ReaderSettings::default());
    }
}
