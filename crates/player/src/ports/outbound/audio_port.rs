//! Audio Port - narrated voice clips, sound effects and background music

use async_trait::async_trait;
use tomie_domain::VoiceClip;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("Failed to load audio: {0}")]
    LoadFailed(String),
}

/// Port for audio output.
///
/// `load` resolves once the clip's metadata is known; it does not start
/// playback. The runner calls `play` only for the clip that is still current,
/// and always calls `stop` for the previous clip first.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AudioPort: Send + Sync {
    /// Load a voice clip and return its duration in seconds.
    async fn load(&self, clip: &VoiceClip) -> Result<f64, AudioError>;

    /// Start a previously loaded voice clip.
    fn play(&self, clip: &VoiceClip);

    /// Stop the current voice clip. No-op when nothing is playing.
    fn stop(&self);

    /// Fire-and-forget sound effect.
    fn play_effect(&self, path: &str);

    /// Rewind the background music and fade it back in.
    fn restart_music(&self);
}
