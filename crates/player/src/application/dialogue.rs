//! Dialogue sequencer
//!
//! Plays a [`DialogueSet`] line by line: typewriter reveal, the line's voice
//! clip, then a post-line wait before the next line. Every timer that belongs to
//! a line lives in its [`LineRun`], so replacing or dropping the run cancels all
//! of them at once.
//!
//! The sequencer reports progress through [`SequencerEvent`]s and leaves the
//! decision about what comes after the last line to its owner.

use tomie_domain::{DialogueLine, DialogueSet};

use super::effects::Effects;
use super::error::SessionError;
use super::typewriter::{Typewriter, TypewriterStep};
use super::voice::{VoiceCoordinator, VoiceTicket};
use crate::ports::outbound::AudioError;

/// Pacing for one dialogue sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogueTiming {
    pub base_interval_ms: u64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    /// Wait after an unvoiced (or unresolved) line.
    pub line_delay_ms: u64,
    /// Wait after the player skipped the reveal.
    pub click_delay_ms: u64,
    /// Added after a voice clip finishes.
    pub voice_pad_ms: u64,
    /// Duration assumed when a clip reports no usable duration.
    pub fallback_voice_secs: f64,
}

impl DialogueTiming {
    /// Per-character interval that spreads `remaining_chars` over `clip_ms`.
    pub fn paced_interval(&self, clip_ms: u64, remaining_chars: usize) -> u64 {
        if remaining_chars == 0 {
            return self.base_interval_ms;
        }
        (clip_ms / remaining_chars as u64).clamp(self.min_interval_ms, self.max_interval_ms)
    }

    fn clip_ms(&self, secs: f64) -> u64 {
        let secs = if secs.is_finite() && secs > 0.0 {
            secs
        } else {
            self.fallback_voice_secs
        };
        (secs * 1000.0).round() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    LineStarted(usize),
    LineCompleted(usize),
    SequenceComplete,
}

/// Everything scheduled on behalf of the line currently on screen.
#[derive(Debug)]
struct LineRun {
    index: usize,
    typewriter: Typewriter,
    voice: Option<VoiceTicket>,
    voice_ends_at: Option<u64>,
    completed_at: Option<u64>,
    skipped: bool,
    advance_at: Option<u64>,
}

impl LineRun {
    fn complete(&mut self, at: u64, timing: &DialogueTiming) -> SequencerEvent {
        self.completed_at = Some(at);
        self.advance_at = Some(self.natural_advance(at, timing));
        SequencerEvent::LineCompleted(self.index)
    }

    fn natural_advance(&self, completed_at: u64, timing: &DialogueTiming) -> u64 {
        match self.voice_ends_at {
            Some(ends_at) => ends_at.max(completed_at) + timing.voice_pad_ms,
            None => completed_at + timing.line_delay_ms,
        }
    }

    fn next_deadline(&self) -> Option<u64> {
        self.typewriter.next_deadline().or(self.advance_at)
    }
}

#[derive(Debug)]
pub struct DialogueSequencer {
    lines: DialogueSet,
    timing: DialogueTiming,
    voice: VoiceCoordinator,
    run: Option<LineRun>,
    finished: bool,
}

impl DialogueSequencer {
    pub fn new(timing: DialogueTiming) -> Self {
        Self {
            lines: DialogueSet::default(),
            timing,
            voice: VoiceCoordinator::new(),
            run: None,
            finished: false,
        }
    }

    /// Replace whatever is playing with `lines` and start the first line.
    pub fn start(
        &mut self,
        lines: DialogueSet,
        timing: DialogueTiming,
        now_ms: u64,
        effects: &mut Effects,
    ) -> Vec<SequencerEvent> {
        self.run = None;
        self.lines = lines;
        self.timing = timing;
        self.finished = false;

        let mut events = Vec::new();
        self.begin_line(0, now_ms, effects, &mut events);
        events
    }

    /// Drop the current line with all of its timers and silence its voice.
    pub fn cancel(&mut self, effects: &mut Effects) {
        if let Some(run) = self.run.take() {
            tracing::debug!(line = run.index, "Dialogue cancelled");
        }
        self.voice.stop(effects);
        self.lines = DialogueSet::default();
        self.finished = false;
    }

    /// Click on the dialogue box.
    ///
    /// Skips the reveal of a line that is still typing, or moves on from a
    /// line that is already fully shown.
    pub fn click(&mut self, now_ms: u64, effects: &mut Effects) -> Vec<SequencerEvent> {
        let click_delay_ms = self.timing.click_delay_ms;
        let Some(run) = self.run.as_mut() else {
            return Vec::new();
        };

        if run.typewriter.force_complete() {
            run.skipped = true;
            run.completed_at = Some(now_ms);
            run.advance_at = Some(now_ms + click_delay_ms);
            let index = run.index;
            self.voice.stop(effects);
            return vec![SequencerEvent::LineCompleted(index)];
        }

        let mut events = Vec::new();
        self.advance(now_ms, effects, &mut events);
        events
    }

    /// Feed a voice load result back in.
    ///
    /// A fresh duration paces the remaining reveal to the clip, or, when the
    /// text already finished, moves the pending advance to the end of the clip.
    pub fn voice_loaded(
        &mut self,
        ticket: VoiceTicket,
        result: Result<f64, AudioError>,
        now_ms: u64,
        effects: &mut Effects,
    ) -> Result<(), SessionError> {
        let secs = self.voice.resolve(ticket, result, effects)?;
        let timing = self.timing;
        let clip_ms = timing.clip_ms(secs);
        let Some(run) = self.run.as_mut().filter(|run| run.voice == Some(ticket)) else {
            return Err(SessionError::Superseded);
        };

        run.voice_ends_at = Some(now_ms + clip_ms);
        if let Some(completed_at) = run.completed_at {
            if !run.skipped {
                run.advance_at = Some(run.natural_advance(completed_at, &timing));
            }
            return Ok(());
        }

        let ideal = timing.paced_interval(clip_ms, run.typewriter.remaining_chars());
        if run.typewriter.retune(ideal, now_ms) {
            tracing::debug!(line = run.index, interval_ms = ideal, "Paced reveal to voice clip");
        }
        Ok(())
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.run.as_ref().and_then(LineRun::next_deadline)
    }

    /// Run whatever is due at `at_ms`: one typewriter tick or the advance.
    pub fn fire(&mut self, at_ms: u64, effects: &mut Effects) -> Vec<SequencerEvent> {
        let timing = self.timing;
        let mut events = Vec::new();
        let Some(run) = self.run.as_mut() else {
            return events;
        };

        if run.typewriter.next_deadline().is_some_and(|due| due <= at_ms) {
            if run.typewriter.tick(at_ms) == TypewriterStep::Completed {
                events.push(run.complete(at_ms, &timing));
            }
            return events;
        }

        if run.advance_at.is_some_and(|due| due <= at_ms) {
            self.advance(at_ms, effects, &mut events);
        }
        events
    }

    /// Text currently on screen. A finished sequence keeps its last line.
    pub fn visible_text(&self) -> &str {
        match &self.run {
            Some(run) => run.typewriter.visible_text(),
            None if self.finished => self
                .lines
                .lines()
                .last()
                .map(DialogueLine::text)
                .unwrap_or_default(),
            None => "",
        }
    }

    pub fn is_text_complete(&self) -> bool {
        self.run
            .as_ref()
            .map_or(self.finished, |run| run.typewriter.is_complete())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn advance(&mut self, now_ms: u64, effects: &mut Effects, events: &mut Vec<SequencerEvent>) {
        let next = self.run.take().map_or(0, |run| run.index + 1);
        self.begin_line(next, now_ms, effects, events);
    }

    fn begin_line(
        &mut self,
        index: usize,
        now_ms: u64,
        effects: &mut Effects,
        events: &mut Vec<SequencerEvent>,
    ) {
        let Some(line) = self.lines.get(index).cloned() else {
            self.run = None;
            self.voice.stop(effects);
            self.finished = true;
            events.push(SequencerEvent::SequenceComplete);
            return;
        };

        tracing::debug!(line = index, voiced = line.voice().is_some(), "Starting dialogue line");
        events.push(SequencerEvent::LineStarted(index));

        let voice = match line.voice() {
            Some(clip) => Some(self.voice.play(clip.clone(), effects)),
            None => {
                self.voice.stop(effects);
                None
            }
        };

        let mut typewriter = Typewriter::new(line.text(), self.timing.base_interval_ms);
        let step = typewriter.start(now_ms);
        let mut run = LineRun {
            index,
            typewriter,
            voice,
            voice_ends_at: None,
            completed_at: None,
            skipped: false,
            advance_at: None,
        };
        if step == TypewriterStep::Completed {
            events.push(run.complete(now_ms, &self.timing));
        }
        self.run = Some(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::effects::Effect;
    use crate::config::TimingConfig;
    use tomie_domain::VoiceClip;

    fn timing() -> DialogueTiming {
        TimingConfig::default().dialogue(3000)
    }

    fn lines(texts: &[&str]) -> DialogueSet {
        texts.iter().map(|t| DialogueLine::new(*t)).collect()
    }

    /// Fire deadlines in order until nothing is due before `until`.
    fn drive(
        seq: &mut DialogueSequencer,
        until: u64,
        effects: &mut Effects,
    ) -> Vec<(u64, SequencerEvent)> {
        let mut seen = Vec::new();
        while let Some(due) = seq.next_deadline() {
            if due > until {
                break;
            }
            for event in seq.fire(due, effects) {
                seen.push((due, event));
            }
        }
        seen
    }

    fn load_ticket(effects: &Effects) -> VoiceTicket {
        effects
            .iter()
            .rev()
            .find_map(|e| match e {
                Effect::LoadVoice { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("a LoadVoice effect")
    }

    #[test]
    fn plays_every_line_once_in_order() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let started = seq.start(lines(&["one", "two", "three"]), timing(), 0, &mut fx);
        assert_eq!(started, vec![SequencerEvent::LineStarted(0)]);

        let events: Vec<_> = drive(&mut seq, u64::MAX, &mut fx)
            .into_iter()
            .map(|(_, e)| e)
            .collect();

        assert_eq!(
            events,
            vec![
                SequencerEvent::LineCompleted(0),
                SequencerEvent::LineStarted(1),
                SequencerEvent::LineCompleted(1),
                SequencerEvent::LineStarted(2),
                SequencerEvent::LineCompleted(2),
                SequencerEvent::SequenceComplete,
            ]
        );
        assert!(seq.is_finished());
        assert_eq!(seq.visible_text(), "three");
    }

    #[test]
    fn unvoiced_line_waits_the_line_delay() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        seq.start(lines(&["ab", "cd"]), timing(), 0, &mut fx);

        let events = drive(&mut seq, 3150, &mut fx);
        // 2 chars at 50ms, completion tick at 150ms, next line 3000ms later.
        assert_eq!(
            events,
            vec![
                (150, SequencerEvent::LineCompleted(0)),
                (3150, SequencerEvent::LineStarted(1)),
            ]
        );
    }

    #[test]
    fn empty_set_completes_immediately() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let events = seq.start(DialogueSet::default(), timing(), 0, &mut fx);
        assert_eq!(events, vec![SequencerEvent::SequenceComplete]);
        assert_eq!(seq.next_deadline(), None);
    }

    #[test]
    fn click_while_typing_shows_full_text_and_shortens_the_wait() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        seq.start(lines(&["hello there", "next"]), timing(), 0, &mut fx);
        drive(&mut seq, 120, &mut fx);

        let events = seq.click(120, &mut fx);
        assert_eq!(events, vec![SequencerEvent::LineCompleted(0)]);
        assert_eq!(seq.visible_text(), "hello there");
        assert_eq!(seq.next_deadline(), Some(120 + 2000));

        let events = drive(&mut seq, 120 + 2000, &mut fx);
        assert_eq!(events, vec![(2120, SequencerEvent::LineStarted(1))]);
    }

    #[test]
    fn click_on_complete_text_advances_immediately() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        seq.start(lines(&["hi", "there"]), timing(), 0, &mut fx);
        seq.click(10, &mut fx);

        let events = seq.click(20, &mut fx);
        assert_eq!(events, vec![SequencerEvent::LineStarted(1)]);
        // the stale advance from the first line is gone with its run
        assert_eq!(seq.next_deadline(), Some(20 + 50));
    }

    #[test]
    fn line_change_stops_old_voice_before_loading_new() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![
            DialogueLine::voiced("a", "/voices/a.mp3"),
            DialogueLine::voiced("b", "/voices/b.mp3"),
        ]);
        seq.start(set, timing(), 0, &mut fx);
        seq.click(10, &mut fx);
        let mut fx = Effects::new();
        seq.click(20, &mut fx);

        let effects: Vec<_> = fx.into_iter().collect();
        // the skip already silenced the first clip, so only a load remains
        assert!(matches!(
            effects.as_slice(),
            [Effect::LoadVoice { clip, .. }] if *clip == VoiceClip::new("/voices/b.mp3")
        ));
    }

    #[test]
    fn advancing_past_a_playing_clip_stops_it_first() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![
            DialogueLine::voiced("a", "/voices/a.mp3"),
            DialogueLine::voiced("b", "/voices/b.mp3"),
        ]);
        seq.start(set, timing(), 0, &mut fx);
        let ticket = load_ticket(&fx);
        seq.voice_loaded(ticket, Ok(0.5), 0, &mut fx)
            .expect("current ticket");

        let mut fx = Effects::new();
        drive(&mut seq, u64::MAX / 2, &mut fx);
        let stop = fx.position(|e| *e == Effect::StopVoice).expect("stop");
        let load = fx
            .position(|e| matches!(e, Effect::LoadVoice { .. }))
            .expect("load");
        assert!(stop < load);
    }

    #[test]
    fn voice_duration_paces_the_reveal() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let text = "x".repeat(20);
        let set = DialogueSet::new(vec![DialogueLine::voiced(text, "/voices/a.mp3")]);
        seq.start(set, timing(), 0, &mut fx);
        let ticket = load_ticket(&fx);

        // 1.6s over 20 chars = 80ms per char
        seq.voice_loaded(ticket, Ok(1.6), 0, &mut fx)
            .expect("current ticket");
        assert_eq!(seq.next_deadline(), Some(80));
        assert!(fx.iter().any(|e| matches!(e, Effect::StartVoice { .. })));
    }

    #[test]
    fn near_base_pacing_keeps_the_running_interval() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![DialogueLine::voiced("x".repeat(20), "/voices/a.mp3")]);
        seq.start(set, timing(), 0, &mut fx);
        let ticket = load_ticket(&fx);

        // 1.1s over 20 chars = 55ms, within hysteresis of 50ms
        seq.voice_loaded(ticket, Ok(1.1), 0, &mut fx)
            .expect("current ticket");
        assert_eq!(seq.next_deadline(), Some(50));
    }

    #[test]
    fn late_duration_rederives_the_pending_advance() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![
            DialogueLine::voiced("ab", "/voices/a.mp3"),
            DialogueLine::new("next"),
        ]);
        seq.start(set, timing(), 0, &mut fx);
        let ticket = load_ticket(&fx);
        drive(&mut seq, 150, &mut fx);
        assert_eq!(seq.next_deadline(), Some(150 + 3000));

        seq.voice_loaded(ticket, Ok(4.0), 200, &mut fx)
            .expect("current ticket");
        assert_eq!(seq.next_deadline(), Some(200 + 4000 + 1000));
    }

    #[test]
    fn failed_voice_falls_back_to_line_delay() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![DialogueLine::voiced("ab", "/voices/a.mp3")]);
        seq.start(set, timing(), 0, &mut fx);
        let ticket = load_ticket(&fx);

        let err = seq
            .voice_loaded(ticket, Err(AudioError::LoadFailed("gone".into())), 10, &mut fx)
            .expect_err("load failed");
        assert!(matches!(err, SessionError::AudioLoad(_)));

        drive(&mut seq, 150, &mut fx);
        assert_eq!(seq.next_deadline(), Some(3150));
    }

    #[test]
    fn voice_result_for_a_previous_line_is_superseded() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![
            DialogueLine::voiced("a", "/voices/a.mp3"),
            DialogueLine::voiced("b", "/voices/b.mp3"),
        ]);
        seq.start(set, timing(), 0, &mut fx);
        let stale = load_ticket(&fx);
        seq.click(5, &mut fx);
        seq.click(6, &mut fx);

        let mut fx = Effects::new();
        let err = seq
            .voice_loaded(stale, Ok(2.0), 7, &mut fx)
            .expect_err("old ticket");
        assert_eq!(err, SessionError::Superseded);
        assert!(fx.is_empty());
    }

    #[test]
    fn voice_result_after_the_last_line_is_superseded() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![DialogueLine::voiced("a", "/voices/a.mp3")]);
        seq.start(set, timing(), 0, &mut fx);
        let ticket = load_ticket(&fx);
        seq.click(5, &mut fx);
        let events = seq.click(6, &mut fx);
        assert!(events.contains(&SequencerEvent::SequenceComplete));

        let mut fx = Effects::new();
        let err = seq
            .voice_loaded(ticket, Ok(2.0), 7, &mut fx)
            .expect_err("line is gone");
        assert_eq!(err, SessionError::Superseded);
        assert!(fx.is_empty());
        assert_eq!(seq.next_deadline(), None);
    }

    #[test]
    fn cancel_drops_every_timer_and_the_voice() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![DialogueLine::voiced("abc", "/voices/a.mp3")]);
        seq.start(set, timing(), 0, &mut fx);

        let mut fx = Effects::new();
        seq.cancel(&mut fx);
        assert_eq!(seq.next_deadline(), None);
        assert!(fx.contains(&Effect::StopVoice));
        assert!(seq.fire(10_000, &mut fx).is_empty());
        assert_eq!(seq.visible_text(), "");
    }

    #[test]
    fn sequence_completion_stops_the_voice() {
        let mut fx = Effects::new();
        let mut seq = DialogueSequencer::new(timing());
        let set = DialogueSet::new(vec![DialogueLine::voiced("a", "/voices/a.mp3")]);
        seq.start(set, timing(), 0, &mut fx);
        let ticket = load_ticket(&fx);
        seq.voice_loaded(ticket, Ok(1.0), 0, &mut fx)
            .expect("current ticket");

        let mut fx = Effects::new();
        let events = drive(&mut seq, u64::MAX / 2, &mut fx);
        assert_eq!(
            events.last().map(|(_, e)| *e),
            Some(SequencerEvent::SequenceComplete)
        );
        assert!(fx.contains(&Effect::StopVoice));
    }
}
