//! Runtime configuration.
//!
//! The host page may pass a JSON object to `init()`; every field is optional
//! and falls back to the defaults below. The active config lives in a
//! `thread_local!` like the rest of the module state.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestConfig {
    /// localStorage key for the quest snapshot.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// localStorage key for the saved album batches.
    #[serde(default = "default_album_key")]
    pub album_key: String,

    /// Place name pre-seeded into the secret section.
    #[serde(default = "default_secret_place")]
    pub secret_place: String,

    /// `log` level name for the browser console ("error" .. "trace").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub timing: TimingConfig,
}

/// Photo normalization limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// JPEG quality, 1..=100.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Ceiling on the encoded data URL length, in bytes.
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: usize,
}

/// Client-side delays baked into rendered fragments (milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_teaser_clue_ms")]
    pub teaser_clue_ms: u32,

    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u32,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            album_key: default_album_key(),
            secret_place: default_secret_place(),
            log_level: default_log_level(),
            pipeline: PipelineConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            jpeg_quality: default_jpeg_quality(),
            max_photo_bytes: default_max_photo_bytes(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            teaser_clue_ms: default_teaser_clue_ms(),
            feedback_ms: default_feedback_ms(),
        }
    }
}

fn default_storage_key() -> String {
    "valentine-quest".to_string()
}
fn default_album_key() -> String {
    "valentine-quest-album".to_string()
}
fn default_secret_place() -> String {
    "Nomu Space".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_dimension() -> u32 {
    1200
}
fn default_jpeg_quality() -> u8 {
    70
}
fn default_max_photo_bytes() -> usize {
    900_000
}
fn default_teaser_clue_ms() -> u32 {
    3000
}
fn default_feedback_ms() -> u32 {
    1800
}

impl QuestConfig {
    /// Parse a config object. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

/// localStorage budget per origin, in characters.
pub const STORAGE_QUOTA_CHARS: usize = 5_000_000;
/// Reserved for quest metadata, album text and the host's own keys.
pub const STORAGE_HEADROOM_CHARS: usize = 400_000;

thread_local! {
    static CONFIG: RefCell<QuestConfig> = RefCell::new(QuestConfig::default());
}

/// Snapshot of the active configuration.
pub fn current() -> QuestConfig {
    CONFIG.with(|c| c.borrow().clone())
}

/// Install a new configuration.
pub fn install(config: QuestConfig) {
    CONFIG.with(|c| *c.borrow_mut() = config);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let cfg = QuestConfig::from_json("").unwrap();
        assert_eq!(cfg, QuestConfig::default());
        assert_eq!(cfg.pipeline.max_dimension, 1200);
        assert_eq!(cfg.pipeline.jpeg_quality, 70);
        assert_eq!(cfg.secret_place, "Nomu Space");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = QuestConfig::from_json(r#"{"storage_key":"test-quest","pipeline":{"max_dimension":800}}"#)
            .unwrap();
        assert_eq!(cfg.storage_key, "test-quest");
        assert_eq!(cfg.pipeline.max_dimension, 800);
        assert_eq!(cfg.pipeline.jpeg_quality, 70);
        assert_eq!(cfg.timing.feedback_ms, 1800);
    }

    #[test]
    fn four_default_photos_fit_the_storage_quota() {
        let photos = 4 * PipelineConfig::default().max_photo_bytes;
        assert!(photos + STORAGE_HEADROOM_CHARS <= STORAGE_QUOTA_CHARS);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(QuestConfig::from_json("{not json").is_err());
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let cfg = QuestConfig {
            log_level: "chatty".to_string(),
            ..QuestConfig::default()
        };
        assert_eq!(cfg.log_level(), log::Level::Info);
    }

    #[test]
    fn install_replaces_current() {
        let cfg = QuestConfig {
            secret_place: "Somewhere".to_string(),
            ..QuestConfig::default()
        };
        install(cfg);
        assert_eq!(current().secret_place, "Somewhere");
        install(QuestConfig::default());
    }
}
