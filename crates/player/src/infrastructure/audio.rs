//! Manifest-backed audio adapter
//!
//! Plays nothing. Clip durations come from a JSON manifest mapping clip path
//! to seconds, which is enough to exercise voice-paced dialogue in a terminal.
//! Clips missing from the manifest fail to load, so the default pacing path is
//! exercised too.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use tomie_domain::VoiceClip;

use crate::ports::outbound::{AudioError, AudioPort};

#[derive(Debug, Default)]
pub struct ManifestAudio {
    durations: HashMap<String, f64>,
    now_playing: RwLock<Option<VoiceClip>>,
}

impl ManifestAudio {
    pub fn new(durations: HashMap<String, f64>) -> Self {
        Self {
            durations,
            now_playing: RwLock::new(None),
        }
    }

    /// Load the manifest, falling back to an empty one when it is unreadable.
    pub fn from_file(path: &Path) -> Self {
        let durations = match std::fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<HashMap<String, f64>>(&data) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("Failed to parse voice manifest {:?}: {}", path, e);
                    HashMap::new()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read voice manifest {:?}: {}", path, e);
                HashMap::new()
            }
        };
        tracing::debug!("Voice manifest loaded with {} clips", durations.len());
        Self::new(durations)
    }

    pub fn now_playing(&self) -> Option<VoiceClip> {
        self.now_playing.read().ok().and_then(|slot| slot.clone())
    }

    fn set_now_playing(&self, clip: Option<VoiceClip>) {
        match self.now_playing.write() {
            Ok(mut slot) => *slot = clip,
            Err(e) => tracing::error!("Voice slot lock poisoned: {}", e),
        }
    }
}

#[async_trait]
impl AudioPort for ManifestAudio {
    async fn load(&self, clip: &VoiceClip) -> Result<f64, AudioError> {
        self.durations
            .get(clip.as_str())
            .copied()
            .ok_or_else(|| AudioError::LoadFailed(format!("{clip} is not in the voice manifest")))
    }

    fn play(&self, clip: &VoiceClip) {
        tracing::info!(clip = %clip, "Voice playing");
        self.set_now_playing(Some(clip.clone()));
    }

    fn stop(&self) {
        if let Some(clip) = self.now_playing() {
            tracing::debug!(clip = %clip, "Voice stopped");
        }
        self.set_now_playing(None);
    }

    fn play_effect(&self, path: &str) {
        tracing::info!(effect = path, "Sound effect");
    }

    fn restart_music(&self) {
        tracing::info!("Background music restarted");
    }
}
