//! Victory and defeat screens
//!
//! Both narrate a short monologue, then fade out, end the wallet session and
//! send the player back to the home screen.

use std::sync::Arc;

use tomie_domain::{MatchEnding, Route, Script};

use super::dialogue::{DialogueSequencer, SequencerEvent};
use super::effects::{Effect, Effects, Input};
use super::fade::FadeController;
use super::screen::{Screen, ScreenView};
use crate::config::TimingConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingView {
    pub ending: MatchEnding,
    pub text: String,
    pub text_complete: bool,
    pub fading: bool,
}

#[derive(Debug)]
pub struct EndingScreen {
    ending: MatchEnding,
    timing: TimingConfig,
    script: Arc<Script>,
    dialogue: DialogueSequencer,
    fade: FadeController<Route>,
}

impl EndingScreen {
    pub fn new(ending: MatchEnding, timing: TimingConfig, script: Arc<Script>) -> Self {
        let dialogue = DialogueSequencer::new(timing.dialogue(timing.ending_line_delay_ms));
        let fade = FadeController::new(timing.fade_ms);
        Self {
            ending,
            timing,
            script,
            dialogue,
            fade,
        }
    }

    fn on_events(&mut self, events: Vec<SequencerEvent>, now_ms: u64) {
        if events.contains(&SequencerEvent::SequenceComplete) && !self.fade.is_fading() {
            tracing::info!(ending = ?self.ending, "Monologue finished, returning home");
            self.fade.begin(Route::Home, now_ms);
        }
    }
}

impl Screen for EndingScreen {
    fn route(&self) -> Route {
        Route::for_match_result(self.ending.player_won())
    }

    fn enter(&mut self, now_ms: u64) -> Effects {
        tracing::info!(ending = ?self.ending, "Entering ending screen");
        let mut effects = Effects::new();
        let lines = self.script.ending_screen_lines(self.ending).clone();
        let timing = self.timing.dialogue(self.timing.ending_line_delay_ms);
        let events = self.dialogue.start(lines, timing, now_ms, &mut effects);
        self.on_events(events, now_ms);
        effects
    }

    fn handle(&mut self, input: Input, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        match input {
            Input::Click => {
                let events = self.dialogue.click(now_ms, &mut effects);
                self.on_events(events, now_ms);
            }
            Input::VoiceLoaded { ticket, result } => {
                if let Err(err) = self.dialogue.voice_loaded(ticket, result, now_ms, &mut effects) {
                    tracing::debug!(error = %err, "Voice load not applied");
                }
            }
            other => tracing::debug!(input = ?other, "Ignoring input on ending screen"),
        }
        effects
    }

    fn next_deadline(&self) -> Option<u64> {
        [self.dialogue.next_deadline(), self.fade.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn fire(&mut self, at_ms: u64) -> Effects {
        let mut effects = Effects::new();
        if self.dialogue.next_deadline().is_some_and(|due| due <= at_ms) {
            let events = self.dialogue.fire(at_ms, &mut effects);
            self.on_events(events, at_ms);
        } else if let Some(route) = self.fade.fire(at_ms) {
            effects.push(Effect::DisconnectWallet);
            effects.push(Effect::RestartMusic);
            effects.push(Effect::Navigate(route));
        }
        effects
    }

    fn shutdown(&mut self) -> Effects {
        let mut effects = Effects::new();
        self.dialogue.cancel(&mut effects);
        self.fade.cancel();
        effects
    }

    fn view(&self) -> ScreenView {
        ScreenView::Ending(EndingView {
            ending: self.ending,
            text: self.dialogue.visible_text().to_string(),
            text_complete: self.dialogue.is_text_complete(),
            fading: self.fade.is_fading(),
        })
    }
}
