//! Player configuration
//!
//! Timing constants for dialogue pacing, result animation and fades, plus the
//! handful of paths the binary needs. Defaults reproduce the shipped game; the
//! environment (or a JSON timing file) can override them.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::application::dialogue::DialogueTiming;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Every timer the client schedules, in milliseconds unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Base typewriter speed per character.
    pub typewriter_interval_ms: u64,
    /// Lower clamp when pacing text to a voice clip.
    pub min_char_interval_ms: u64,
    /// Upper clamp when pacing text to a voice clip.
    pub max_char_interval_ms: u64,
    /// Wait after an unvoiced intro line before advancing.
    pub intro_line_delay_ms: u64,
    /// Wait after an unvoiced result line before advancing.
    pub result_line_delay_ms: u64,
    /// Wait after an unvoiced end-of-match or ending-screen line.
    pub ending_line_delay_ms: u64,
    /// Wait after the player clicks through a line that was still typing.
    pub click_delay_ms: u64,
    /// Added to the clip duration for voiced lines.
    pub voice_pad_ms: u64,
    /// Duration assumed when a clip loads without usable metadata (seconds).
    pub fallback_voice_secs: f64,
    /// Time for the hands to slide in during the result animation.
    pub hands_settle_ms: u64,
    /// Time from the result reveal until result dialogues start.
    pub result_dialogue_delay_ms: u64,
    /// How long Tomie's expression overlay stays up.
    pub expression_ms: u64,
    /// Fade-to-black before navigation.
    pub fade_ms: u64,
    /// Delay before refetching game status after a round settles.
    pub status_refresh_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            typewriter_interval_ms: 50,
            min_char_interval_ms: 30,
            max_char_interval_ms: 100,
            intro_line_delay_ms: 3000,
            result_line_delay_ms: 5000,
            ending_line_delay_ms: 3000,
            click_delay_ms: 2000,
            voice_pad_ms: 1000,
            fallback_voice_secs: 3.0,
            hands_settle_ms: 1800,
            result_dialogue_delay_ms: 4500,
            expression_ms: 3000,
            fade_ms: 2000,
            status_refresh_delay_ms: 1500,
        }
    }
}

impl TimingConfig {
    /// Dialogue pacing for a sequence whose unvoiced lines wait `line_delay_ms`.
    pub fn dialogue(&self, line_delay_ms: u64) -> DialogueTiming {
        DialogueTiming {
            base_interval_ms: self.typewriter_interval_ms,
            min_interval_ms: self.min_char_interval_ms,
            max_interval_ms: self.max_char_interval_ms,
            line_delay_ms,
            click_delay_ms: self.click_delay_ms.min(line_delay_ms),
            voice_pad_ms: self.voice_pad_ms,
            fallback_voice_secs: self.fallback_voice_secs,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides(&mut self) {
        override_from_env("TOMIE_TYPEWRITER_INTERVAL_MS", &mut self.typewriter_interval_ms);
        override_from_env("TOMIE_CLICK_DELAY_MS", &mut self.click_delay_ms);
        override_from_env("TOMIE_FADE_MS", &mut self.fade_ms);
        override_from_env("TOMIE_STATUS_REFRESH_DELAY_MS", &mut self.status_refresh_delay_ms);
    }
}

const DEFAULT_STARTING_LIVES: u8 = 3;

/// Top-level configuration for the `tomie-player` binary.
#[derive(Debug, Clone, Default)]
pub struct PlayerConfig {
    pub timing: TimingConfig,
    /// JSON map of voice clip path -> duration in seconds.
    pub voice_manifest: Option<PathBuf>,
    /// JSON narrative script replacing the built-in one.
    pub script_file: Option<PathBuf>,
    /// Lives each side starts with in the offline game service.
    pub starting_lives: u8,
    /// Route to open on launch (defaults to `/`).
    pub start_route: Option<String>,
}

impl PlayerConfig {
    /// Load configuration from `TOMIE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut timing = match env_string("TOMIE_TIMING_FILE") {
            Some(path) => TimingConfig::from_file(Path::new(&path))?,
            None => TimingConfig::default(),
        };
        timing.apply_env_overrides();

        let mut starting_lives = DEFAULT_STARTING_LIVES;
        override_from_env("TOMIE_STARTING_LIVES", &mut starting_lives);

        Ok(Self {
            timing,
            voice_manifest: env_string("TOMIE_VOICE_MANIFEST").map(PathBuf::from),
            script_file: env_string("TOMIE_SCRIPT_FILE").map(PathBuf::from),
            starting_lives,
            start_route: env_string("TOMIE_START_ROUTE"),
        })
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn override_from_env<T: FromStr>(key: &str, target: &mut T) {
    apply_override(key, env_string(key), target);
}

/// Parse `raw` into `target`, keeping the current value when it does not parse.
fn apply_override<T: FromStr>(key: &str, raw: Option<String>, target: &mut T) -> bool {
    let Some(raw) = raw else {
        return false;
    };
    match raw.parse() {
        Ok(value) => {
            *target = value;
            true
        }
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid number", key, raw);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let timing: TimingConfig =
            serde_json::from_str(r#"{"fade_ms": 500}"#).expect("valid timing json");
        assert_eq!(timing.fade_ms, 500);
        assert_eq!(timing.typewriter_interval_ms, 50);
        assert_eq!(timing.result_dialogue_delay_ms, 4500);
    }

    #[test]
    fn click_delay_never_exceeds_line_delay() {
        let timing = TimingConfig::default();
        assert_eq!(timing.dialogue(5000).click_delay_ms, 2000);
        assert_eq!(timing.dialogue(1200).click_delay_ms, 1200);
    }

    #[test]
    fn unparsable_override_keeps_the_default() {
        let mut lives = DEFAULT_STARTING_LIVES;
        assert!(!apply_override("TOMIE_STARTING_LIVES", Some("lots".to_string()), &mut lives));
        assert!(!apply_override("TOMIE_STARTING_LIVES", Some("300".to_string()), &mut lives));
        assert_eq!(lives, 3);

        assert!(apply_override("TOMIE_STARTING_LIVES", Some("5".to_string()), &mut lives));
        assert_eq!(lives, 5);

        let mut fade_ms = 2000_u64;
        assert!(!apply_override("TOMIE_FADE_MS", None, &mut fade_ms));
        assert_eq!(fade_ms, 2000);
    }

    #[test]
    fn missing_timing_file_is_a_read_error() {
        let err = TimingConfig::from_file(Path::new("/definitely/not/here.json"))
            .expect_err("file does not exist");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
