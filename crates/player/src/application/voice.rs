//! Voice playback coordinator
//!
//! Owns the single voice slot. Every `play` hands out a fresh [`VoiceTicket`];
//! a load result is only honoured while its ticket is still current, so a slow
//! load for an old line can never make the old clip audible.

use tomie_domain::VoiceClip;

use super::effects::{Effect, Effects};
use super::error::SessionError;
use crate::ports::outbound::AudioError;

/// Generation counter for voice loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceTicket(u64);

impl VoiceTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct ActiveClip {
    ticket: VoiceTicket,
    clip: VoiceClip,
}

#[derive(Debug, Default)]
pub struct VoiceCoordinator {
    last_ticket: u64,
    active: Option<ActiveClip>,
}

impl VoiceCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede whatever is playing and request `clip`.
    ///
    /// `StopVoice` for the previous clip is always pushed before `LoadVoice`.
    pub fn play(&mut self, clip: VoiceClip, effects: &mut Effects) -> VoiceTicket {
        self.stop(effects);
        self.last_ticket += 1;
        let ticket = VoiceTicket(self.last_ticket);
        tracing::debug!(ticket = ticket.0, clip = %clip, "Loading voice clip");
        effects.push(Effect::LoadVoice {
            ticket,
            clip: clip.clone(),
        });
        self.active = Some(ActiveClip { ticket, clip });
        ticket
    }

    /// Accept a load result.
    ///
    /// Returns the clip duration in seconds and pushes `StartVoice` when the
    /// ticket is still current and the load succeeded.
    pub fn resolve(
        &mut self,
        ticket: VoiceTicket,
        result: Result<f64, AudioError>,
        effects: &mut Effects,
    ) -> Result<f64, SessionError> {
        let Some(active) = self.active.as_ref().filter(|a| a.ticket == ticket) else {
            tracing::debug!(ticket = ticket.0, "Dropping superseded voice load");
            return Err(SessionError::Superseded);
        };

        match result {
            Ok(secs) => {
                effects.push(Effect::StartVoice {
                    ticket,
                    clip: active.clip.clone(),
                });
                Ok(secs)
            }
            Err(err) => {
                tracing::warn!(ticket = ticket.0, clip = %active.clip, error = %err, "Voice clip failed to load");
                self.active = None;
                Err(err.into())
            }
        }
    }

    /// Silence the current clip. Returns `false` when nothing was active.
    pub fn stop(&mut self, effects: &mut Effects) -> bool {
        match self.active.take() {
            Some(_) => {
                effects.push(Effect::StopVoice);
                true
            }
            None => false,
        }
    }
}
