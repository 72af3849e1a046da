//! Dialogue value objects
//!
//! A [`DialogueSet`] is the ordered list of lines narrated in one phase. It is
//! fixed when the phase is entered and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Path or identifier of a narrated audio clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceClip(String);

impl VoiceClip {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One unit of narrated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    voice: Option<VoiceClip>,
}

impl DialogueLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
        }
    }

    pub fn voiced(text: impl Into<String>, clip: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: Some(VoiceClip::new(clip)),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice(&self) -> Option<&VoiceClip> {
        self.voice.as_ref()
    }

    /// Number of typewriter units (characters, not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Ordered, phase-scoped sequence of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogueSet(Vec<DialogueLine>);

impl DialogueSet {
    pub fn new(lines: Vec<DialogueLine>) -> Self {
        Self(lines)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DialogueLine> {
        self.0.get(index)
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.0
    }
}

impl FromIterator<DialogueLine> for DialogueSet {
    fn from_iter<I: IntoIterator<Item = DialogueLine>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
