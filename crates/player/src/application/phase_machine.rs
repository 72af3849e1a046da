//! Game phase state machine for the table screen
//!
//! Drives one match from the intro monologue through rounds of
//! rock-paper-scissors to the end-of-match dialogue, then fades out towards
//! the victory or defeat screen.
//!
//! ```text
//! Intro -> Choices -> ResultAnimation -> ResultDialogues -> Choices ...
//!                                                       \-> GameEnded -> fade -> /victory | /defeat
//! ```
//!
//! The move result is the only source for the round outcome, whether the match
//! ended and who won. It is carried in the machine as a [`MoveOutcome`] until
//! the phase that needs it has consumed it.

use std::sync::Arc;

use tomie_domain::{
    Choice, DialogueSet, ExpressionCue, GameId, GameStatus, MatchEnding, MoveOutcome, Phase,
    Route, RoundResult, Script,
};

use super::dialogue::{DialogueSequencer, SequencerEvent};
use super::effects::{Effect, Effects, Input};
use super::error::SessionError;
use super::fade::FadeController;
use super::screen::{Screen, ScreenView};
use crate::config::TimingConfig;
use crate::ports::outbound::ServiceError;

/// Presentation snapshot of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub game_id: GameId,
    pub phase: Phase,
    pub text: String,
    pub text_complete: bool,
    /// Buttons on screen. Picking one hides the other two.
    pub choices: Vec<Choice>,
    pub selected_choice: Option<Choice>,
    pub submitting: bool,
    pub round: Option<RoundResult>,
    pub hands_settled: bool,
    pub expression: Option<ExpressionCue>,
    pub status: Option<GameStatus>,
    pub error: Option<String>,
    pub fading: bool,
}

#[derive(Debug)]
pub struct GamePhaseMachine {
    game_id: GameId,
    timing: TimingConfig,
    script: Arc<Script>,
    phase: Phase,
    dialogue: DialogueSequencer,
    selected_choice: Option<Choice>,
    submitting: bool,
    outcome: Option<MoveOutcome>,
    ending: Option<MatchEnding>,
    hands_settled: bool,
    hands_settle_at: Option<u64>,
    result_dialogues_at: Option<u64>,
    expression: Option<(ExpressionCue, u64)>,
    status: Option<GameStatus>,
    status_refresh_at: Option<u64>,
    fade: FadeController<Route>,
    error: Option<SessionError>,
}

impl GamePhaseMachine {
    pub fn new(game_id: GameId, timing: TimingConfig, script: Arc<Script>) -> Self {
        let dialogue = DialogueSequencer::new(timing.dialogue(timing.intro_line_delay_ms));
        let fade = FadeController::new(timing.fade_ms);
        Self {
            game_id,
            timing,
            script,
            phase: Phase::Intro,
            dialogue,
            selected_choice: None,
            submitting: false,
            outcome: None,
            ending: None,
            hands_settled: false,
            hands_settle_at: None,
            result_dialogues_at: None,
            expression: None,
            status: None,
            status_refresh_at: None,
            fade,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_choice(&self) -> Option<Choice> {
        self.selected_choice
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    fn transition(&mut self, next: Phase) -> bool {
        match self.phase.transition_to(next) {
            Ok(phase) => {
                tracing::info!(game_id = %self.game_id, from = %self.phase, to = %phase, "Phase transition");
                self.phase = phase;
                true
            }
            Err(err) => {
                tracing::warn!(game_id = %self.game_id, error = %err, "Rejected phase transition");
                false
            }
        }
    }

    fn start_dialogue(&mut self, lines: DialogueSet, line_delay_ms: u64, now_ms: u64, effects: &mut Effects) {
        let timing = self.timing.dialogue(line_delay_ms);
        let events = self.dialogue.start(lines, timing, now_ms, effects);
        self.on_dialogue_events(events, now_ms, effects);
    }

    fn on_dialogue_events(&mut self, events: Vec<SequencerEvent>, now_ms: u64, effects: &mut Effects) {
        if events.contains(&SequencerEvent::SequenceComplete) {
            self.on_sequence_complete(now_ms, effects);
        }
    }

    fn on_sequence_complete(&mut self, now_ms: u64, effects: &mut Effects) {
        match self.phase {
            Phase::Intro => {
                self.enter_choices();
            }
            Phase::ResultDialogues => match self.outcome.take().and_then(|o| o.ending) {
                Some(ending) => self.enter_game_ended(ending, now_ms, effects),
                None => {
                    self.enter_choices();
                    self.status_refresh_at = Some(now_ms + self.timing.status_refresh_delay_ms);
                }
            },
            Phase::GameEnded => self.begin_exit_fade(now_ms),
            Phase::Choices | Phase::ResultAnimation => {
                tracing::debug!(phase = %self.phase, "Dialogue finished outside a dialogue phase");
            }
        }
    }

    fn begin_exit_fade(&mut self, now_ms: u64) {
        let Some(ending) = self.ending else {
            tracing::warn!(game_id = %self.game_id, "End dialogue finished without a match ending");
            return;
        };
        let route = Route::for_match_result(ending.player_won());
        tracing::info!(game_id = %self.game_id, route = %route, "Match over, fading out");
        self.fade.begin(route, now_ms);
    }

    fn dismiss_error(&mut self, now_ms: u64) {
        if self.error.take().is_none() {
            return;
        }
        // An exit fade cancelled by the error resumes once it is acknowledged.
        if self.phase == Phase::GameEnded && self.dialogue.is_finished() && !self.fade.is_fading() {
            self.begin_exit_fade(now_ms);
        }
    }

    fn wallet_lost(&mut self) {
        tracing::warn!(game_id = %self.game_id, "Wallet session lost");
        if self.fade.cancel().is_some() {
            tracing::info!(game_id = %self.game_id, "Exit fade cancelled");
        }
        self.error = Some(SessionError::Connection(
            "Wallet disconnected, reconnect to keep playing".to_string(),
        ));
    }

    fn enter_choices(&mut self) {
        if !self.transition(Phase::Choices) {
            return;
        }
        self.selected_choice = None;
        self.submitting = false;
        self.outcome = None;
        self.hands_settled = false;
    }

    fn enter_game_ended(&mut self, ending: MatchEnding, now_ms: u64, effects: &mut Effects) {
        if !self.transition(Phase::GameEnded) {
            return;
        }
        self.ending = Some(ending);
        self.selected_choice = None;
        self.hands_settled = false;
        self.status_refresh_at = Some(now_ms + self.timing.status_refresh_delay_ms);
        let lines = self.script.game_end_lines(ending).clone();
        self.start_dialogue(lines, self.timing.ending_line_delay_ms, now_ms, effects);
    }

    fn choose(&mut self, choice: Choice, effects: &mut Effects) {
        if self.phase != Phase::Choices {
            tracing::debug!(phase = %self.phase, choice = %choice, "Ignoring choice outside Choices");
            return;
        }
        if let Some(selected) = self.selected_choice {
            tracing::debug!(selected = %selected, choice = %choice, "Ignoring duplicate choice");
            return;
        }

        tracing::info!(game_id = %self.game_id, choice = %choice, "Submitting move");
        self.selected_choice = Some(choice);
        self.submitting = true;
        self.error = None;
        effects.push(Effect::PlaySubmitJingle);
        effects.push(Effect::SubmitMove {
            game_id: self.game_id,
            choice,
        });
    }

    fn move_resolved(&mut self, result: Result<MoveOutcome, ServiceError>, now_ms: u64) {
        if !self.submitting || self.phase != Phase::Choices {
            tracing::warn!(game_id = %self.game_id, phase = %self.phase, "Ignoring stale move result");
            return;
        }
        self.submitting = false;

        match result {
            Ok(outcome) => {
                if !self.transition(Phase::ResultAnimation) {
                    return;
                }
                tracing::info!(
                    game_id = %self.game_id,
                    outcome = %outcome.round.outcome,
                    match_ended = outcome.match_ended(),
                    "Round settled"
                );
                self.hands_settled = false;
                self.hands_settle_at = Some(now_ms + self.timing.hands_settle_ms);
                self.result_dialogues_at = Some(now_ms + self.timing.result_dialogue_delay_ms);
                if let Some(cue) = outcome.expression {
                    self.expression = Some((cue, now_ms + self.timing.expression_ms));
                }
                self.outcome = Some(outcome);
            }
            Err(err) => {
                tracing::error!(game_id = %self.game_id, error = %err, "Move submission failed");
                self.selected_choice = None;
                self.error = Some(SessionError::from_service("Failed to play move", err));
            }
        }
    }

    fn start_result_dialogues(&mut self, now_ms: u64, effects: &mut Effects) {
        let Some(outcome) = self.outcome else {
            tracing::warn!(game_id = %self.game_id, "Result animation ended without a round");
            return;
        };
        if !self.transition(Phase::ResultDialogues) {
            return;
        }
        let lines = self.script.result_lines(outcome.round.outcome).clone();
        self.start_dialogue(lines, self.timing.result_line_delay_ms, now_ms, effects);
    }

    fn visible_choices(&self) -> Vec<Choice> {
        if self.phase != Phase::Choices {
            return Vec::new();
        }
        match self.selected_choice {
            Some(choice) => vec![choice],
            None => Choice::all().to_vec(),
        }
    }
}

impl Screen for GamePhaseMachine {
    fn route(&self) -> Route {
        Route::Table(self.game_id)
    }

    fn enter(&mut self, now_ms: u64) -> Effects {
        tracing::info!(game_id = %self.game_id, "Entering table");
        let mut effects = Effects::new();
        effects.push(Effect::FetchStatus {
            game_id: self.game_id,
        });
        let intro = self.script.intro.clone();
        self.start_dialogue(intro, self.timing.intro_line_delay_ms, now_ms, &mut effects);
        effects
    }

    fn handle(&mut self, input: Input, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        match input {
            Input::Click if self.phase.has_dialogue() => {
                let events = self.dialogue.click(now_ms, &mut effects);
                self.on_dialogue_events(events, now_ms, &mut effects);
            }
            Input::Choose(choice) => self.choose(choice, &mut effects),
            Input::MoveResolved(result) => self.move_resolved(result, now_ms),
            Input::StatusLoaded(Ok(status)) => {
                tracing::debug!(game_id = %self.game_id, status = %status.summary(), "Status refreshed");
                self.status = Some(status);
            }
            Input::StatusLoaded(Err(err)) => {
                tracing::warn!(game_id = %self.game_id, error = %err, "Status fetch failed, keeping previous");
            }
            Input::VoiceLoaded { ticket, result } => {
                if let Err(err) = self.dialogue.voice_loaded(ticket, result, now_ms, &mut effects) {
                    tracing::debug!(error = %err, "Voice load not applied");
                }
            }
            Input::DismissError => self.dismiss_error(now_ms),
            Input::WalletLost => self.wallet_lost(),
            other => {
                tracing::debug!(phase = %self.phase, input = ?other, "Ignoring input");
            }
        }
        effects
    }

    fn next_deadline(&self) -> Option<u64> {
        [
            self.hands_settle_at,
            self.result_dialogues_at,
            self.dialogue.next_deadline(),
            self.expression.map(|(_, until)| until),
            self.status_refresh_at,
            self.fade.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn fire(&mut self, at_ms: u64) -> Effects {
        let mut effects = Effects::new();
        let due = |deadline: Option<u64>| deadline.is_some_and(|d| d <= at_ms);

        if due(self.hands_settle_at) {
            self.hands_settle_at = None;
            self.hands_settled = true;
        } else if due(self.result_dialogues_at) {
            self.result_dialogues_at = None;
            self.start_result_dialogues(at_ms, &mut effects);
        } else if due(self.dialogue.next_deadline()) {
            let events = self.dialogue.fire(at_ms, &mut effects);
            self.on_dialogue_events(events, at_ms, &mut effects);
        } else if due(self.expression.map(|(_, until)| until)) {
            self.expression = None;
        } else if due(self.status_refresh_at) {
            self.status_refresh_at = None;
            effects.push(Effect::FetchStatus {
                game_id: self.game_id,
            });
        } else if let Some(route) = self.fade.fire(at_ms) {
            effects.push(Effect::Navigate(route));
        }
        effects
    }

    fn shutdown(&mut self) -> Effects {
        tracing::info!(game_id = %self.game_id, phase = %self.phase, "Leaving table");
        let mut effects = Effects::new();
        self.dialogue.cancel(&mut effects);
        self.fade.cancel();
        self.hands_settle_at = None;
        self.result_dialogues_at = None;
        self.expression = None;
        self.status_refresh_at = None;
        self.submitting = false;
        effects
    }

    fn view(&self) -> ScreenView {
        ScreenView::Table(TableView {
            game_id: self.game_id,
            phase: self.phase,
            text: self.dialogue.visible_text().to_string(),
            text_complete: self.dialogue.is_text_complete(),
            choices: self.visible_choices(),
            selected_choice: self.selected_choice,
            submitting: self.submitting,
            round: self.outcome.map(|o| o.round),
            hands_settled: self.hands_settled,
            expression: self.expression.map(|(cue, _)| cue),
            status: self.status,
            error: self.error.as_ref().map(ToString::to_string),
            fading: self.fade.is_fading(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomie_domain::{DialogueLine, EndingLines, Outcome, OutcomeLines};

    fn set(texts: &[&str]) -> DialogueSet {
        texts.iter().map(|t| DialogueLine::new(*t)).collect()
    }

    fn script() -> Arc<Script> {
        Arc::new(Script {
            intro: set(&["hi", "yo"]),
            results: OutcomeLines {
                draw: set(&["draw"]),
                player_wins: set(&["nice"]),
                tomie_wins: set(&["mine"]),
            },
            game_end: EndingLines {
                player_won: set(&["you win"]),
                player_lost: set(&["you lose"]),
            },
            victory: set(&["free"]),
            defeat: set(&["stay"]),
            submit_jingles: vec!["/music/jankenpon_1.mp3".to_string()],
        })
    }

    fn machine() -> GamePhaseMachine {
        GamePhaseMachine::new(GameId::new(7), TimingConfig::default(), script())
    }

    fn table(m: &GamePhaseMachine) -> TableView {
        match m.view() {
            ScreenView::Table(view) => view,
            other => panic!("expected table view, got {other:?}"),
        }
    }

    /// Enter and let the intro play out.
    fn at_choices() -> GamePhaseMachine {
        let mut m = machine();
        m.enter(0);
        m.advance(10_000);
        assert_eq!(m.phase(), Phase::Choices);
        m
    }

    fn won_round() -> MoveOutcome {
        MoveOutcome::continuing(RoundResult::new(Choice::Paper, Choice::Rock, Outcome::PlayerWins))
    }

    #[test]
    fn enter_fetches_status_and_plays_intro() {
        let mut m = machine();
        let effects = m.enter(0);

        assert!(effects.contains(&Effect::FetchStatus {
            game_id: GameId::new(7)
        }));
        assert_eq!(m.phase(), Phase::Intro);
        assert!(table(&m).choices.is_empty());
    }

    #[test]
    fn intro_completion_arms_all_choices() {
        let m = at_choices();
        let view = table(&m);
        assert_eq!(view.choices, Choice::all().to_vec());
        assert_eq!(view.selected_choice, None);
        assert_eq!(view.text, "yo");
    }

    #[test]
    fn clicks_can_skip_through_the_intro() {
        let mut m = machine();
        m.enter(0);
        m.handle(Input::Click, 10);
        m.handle(Input::Click, 20);
        m.handle(Input::Click, 30);
        m.handle(Input::Click, 40);
        assert_eq!(m.phase(), Phase::Choices);
    }

    #[test]
    fn choosing_plays_jingle_then_submits_once() {
        let mut m = at_choices();
        let effects: Vec<_> = m.handle(Input::Choose(Choice::Rock), 10_000).into_iter().collect();
        assert_eq!(
            effects,
            vec![
                Effect::PlaySubmitJingle,
                Effect::SubmitMove {
                    game_id: GameId::new(7),
                    choice: Choice::Rock
                },
            ]
        );

        let view = table(&m);
        assert_eq!(view.choices, vec![Choice::Rock]);
        assert!(view.submitting);

        assert!(m.handle(Input::Choose(Choice::Paper), 10_001).is_empty());
        assert_eq!(m.selected_choice(), Some(Choice::Rock));
    }

    #[test]
    fn choices_are_ignored_outside_choices_phase() {
        let mut m = machine();
        m.enter(0);
        assert!(m.handle(Input::Choose(Choice::Rock), 10).is_empty());
        assert_eq!(m.selected_choice(), None);
    }

    #[test]
    fn submission_error_returns_to_choices_with_everything_enabled() {
        let mut m = at_choices();
        m.handle(Input::Choose(Choice::Rock), 10_000);
        m.handle(
            Input::MoveResolved(Err(ServiceError::Transaction("reverted".to_string()))),
            10_500,
        );

        assert_eq!(m.phase(), Phase::Choices);
        assert_eq!(m.selected_choice(), None);
        let view = table(&m);
        assert_eq!(view.choices, Choice::all().to_vec());
        assert!(!view.submitting);
        assert!(matches!(m.error(), Some(SessionError::Submission(_))));

        // retry is possible
        assert!(!m.handle(Input::Choose(Choice::Scissors), 11_000).is_empty());
    }

    #[test]
    fn missing_wallet_surfaces_a_connection_error() {
        let mut m = at_choices();
        m.handle(Input::Choose(Choice::Rock), 10_000);
        m.handle(Input::MoveResolved(Err(ServiceError::NotConnected)), 10_100);

        assert!(m.error().is_some_and(SessionError::is_connection));
        assert_eq!(m.phase(), Phase::Choices);

        m.handle(Input::DismissError, 10_200);
        assert!(m.error().is_none());
    }

    #[test]
    fn stale_move_result_is_ignored() {
        let mut m = at_choices();
        m.handle(Input::MoveResolved(Ok(won_round())), 10_000);
        assert_eq!(m.phase(), Phase::Choices);
        assert_eq!(m.next_deadline(), None);
    }

    #[test]
    fn winning_round_plays_results_then_returns_to_choices_and_refreshes() {
        let mut m = at_choices();
        m.handle(Input::Choose(Choice::Paper), 10_000);
        m.handle(Input::MoveResolved(Ok(won_round())), 10_500);

        assert_eq!(m.phase(), Phase::ResultAnimation);
        let view = table(&m);
        assert_eq!(view.round, Some(won_round().round));
        assert!(!view.hands_settled);

        m.advance(10_500 + 1800);
        assert!(table(&m).hands_settled);
        assert_eq!(m.phase(), Phase::ResultAnimation);

        m.advance(10_500 + 4500);
        assert_eq!(m.phase(), Phase::ResultDialogues);

        // "nice": 4 chars + completion tick, then the result line delay
        m.advance(15_000 + 250 + 5000 - 1);
        assert_eq!(m.phase(), Phase::ResultDialogues);
        assert_eq!(table(&m).text, "nice");

        let effects = m.advance(15_000 + 250 + 5000);
        assert!(effects.is_empty());
        assert_eq!(m.phase(), Phase::Choices);
        assert_eq!(table(&m).round, None);

        let effects = m.advance(20_250 + 1500);
        assert!(effects.contains(&Effect::FetchStatus {
            game_id: GameId::new(7)
        }));

        let status = GameStatus {
            game_id: GameId::new(7),
            lives: 3,
            tomie_lives: 2,
            current_minigame: 2,
            in_progress: true,
        };
        m.handle(Input::StatusLoaded(Ok(status)), 22_000);
        assert_eq!(table(&m).status, Some(status));
    }

    #[test]
    fn lost_match_ends_with_defeat_navigation() {
        let mut m = at_choices();
        m.handle(Input::Choose(Choice::Rock), 10_000);
        let outcome = MoveOutcome::ended(
            RoundResult::new(Choice::Rock, Choice::Paper, Outcome::TomieWins),
            MatchEnding::PlayerLost,
        );
        m.handle(Input::MoveResolved(Ok(outcome)), 10_000);

        m.advance(14_500);
        assert_eq!(m.phase(), Phase::ResultDialogues);
        assert_eq!(m.dialogue.visible_text(), "");

        // "mine" ends at 14_750 and its line delay runs out at 19_750
        m.advance(20_000);
        assert_eq!(m.phase(), Phase::GameEnded);
        assert_eq!(table(&m).round, None);

        let effects = m.advance(60_000);
        assert_eq!(table(&m).text, "you lose");
        assert!(effects.contains(&Effect::Navigate(Route::Defeat)));
        assert!(!table(&m).fading);
    }

    /// Lose the deciding round and play up to the start of the end dialogue.
    fn at_lost_match_end() -> GamePhaseMachine {
        let mut m = at_choices();
        m.handle(Input::Choose(Choice::Rock), 10_000);
        let outcome = MoveOutcome::ended(
            RoundResult::new(Choice::Rock, Choice::Paper, Outcome::TomieWins),
            MatchEnding::PlayerLost,
        );
        m.handle(Input::MoveResolved(Ok(outcome)), 10_000);
        m.advance(20_000);
        assert_eq!(m.phase(), Phase::GameEnded);
        m
    }

    #[test]
    fn deciding_round_refreshes_status_before_the_end_dialogue_finishes() {
        let mut m = at_lost_match_end();

        // GameEnded at 19_750, refresh 1500ms later, fade not before 23_200
        let effects = m.advance(22_000);
        assert!(effects.contains(&Effect::FetchStatus {
            game_id: GameId::new(7)
        }));
        assert!(!effects.contains(&Effect::Navigate(Route::Defeat)));

        let status = GameStatus {
            game_id: GameId::new(7),
            lives: 0,
            tomie_lives: 2,
            current_minigame: 4,
            in_progress: false,
        };
        m.handle(Input::StatusLoaded(Ok(status)), 22_100);
        assert_eq!(table(&m).status, Some(status));
    }

    #[test]
    fn wallet_loss_during_exit_fade_cancels_navigation_until_dismissed() {
        let mut m = at_lost_match_end();

        // "you lose" completes at 20_200, its line delay ends at 23_200
        m.advance(24_000);
        assert!(table(&m).fading);

        m.handle(Input::WalletLost, 24_000);
        let view = table(&m);
        assert!(!view.fading);
        assert!(m.error().is_some_and(SessionError::is_connection));

        let effects = m.advance(60_000);
        assert!(!effects.contains(&Effect::Navigate(Route::Defeat)));
        assert!(m.error().is_some());

        m.handle(Input::DismissError, 60_000);
        assert!(m.error().is_none());
        assert!(table(&m).fading);

        let effects = m.advance(62_000);
        assert!(effects.contains(&Effect::Navigate(Route::Defeat)));
    }

    #[test]
    fn won_match_navigates_to_victory() {
        let mut m = at_choices();
        m.handle(Input::Choose(Choice::Scissors), 10_000);
        let outcome = MoveOutcome::ended(
            RoundResult::new(Choice::Scissors, Choice::Paper, Outcome::PlayerWins),
            MatchEnding::PlayerWon,
        );
        m.handle(Input::MoveResolved(Ok(outcome)), 10_000);

        let effects = m.advance(60_000);
        assert!(effects.contains(&Effect::Navigate(Route::Victory)));
    }

    #[test]
    fn expression_overlay_runs_on_its_own_clock() {
        let mut m = at_choices();
        m.handle(Input::Choose(Choice::Rock), 10_000);
        let outcome = MoveOutcome::continuing(RoundResult::new(
            Choice::Rock,
            Choice::Paper,
            Outcome::TomieWins,
        ))
        .with_expression(ExpressionCue(1));
        m.handle(Input::MoveResolved(Ok(outcome)), 10_000);

        assert_eq!(table(&m).expression, Some(ExpressionCue(1)));
        m.advance(12_999);
        assert_eq!(table(&m).expression, Some(ExpressionCue(1)));
        m.advance(13_000);
        assert_eq!(table(&m).expression, None);
        assert_eq!(m.phase(), Phase::ResultAnimation);
    }

    #[test]
    fn shutdown_drops_every_deadline() {
        let mut m = at_choices();
        m.handle(Input::Choose(Choice::Rock), 10_000);
        m.handle(Input::MoveResolved(Ok(won_round().with_expression(ExpressionCue(2)))), 10_000);
        assert!(m.next_deadline().is_some());

        m.shutdown();
        assert_eq!(m.next_deadline(), None);
        assert!(m.advance(100_000).is_empty());
    }
}
