//! Round results as reported by the move submission service

use serde::{Deserialize, Serialize};

use crate::choice::{Choice, Outcome};

/// Hands played in one round and how it was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub player_choice: Choice,
    pub tomie_choice: Choice,
    pub outcome: Outcome,
}

impl RoundResult {
    pub fn new(player_choice: Choice, tomie_choice: Choice, outcome: Outcome) -> Self {
        Self {
            player_choice,
            tomie_choice,
            outcome,
        }
    }

    /// Builds a round whose outcome follows the classic rules.
    pub fn played(player_choice: Choice, tomie_choice: Choice) -> Self {
        Self::new(player_choice, tomie_choice, player_choice.against(tomie_choice))
    }
}

/// Transient facial expression Tomie reacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpressionCue(pub u8);

impl ExpressionCue {
    pub fn id(self) -> u8 {
        self.0
    }
}

/// How a finished match ended, from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEnding {
    PlayerWon,
    PlayerLost,
}

impl MatchEnding {
    pub fn from_player_won(player_won: bool) -> Self {
        if player_won {
            MatchEnding::PlayerWon
        } else {
            MatchEnding::PlayerLost
        }
    }

    pub fn player_won(self) -> bool {
        matches!(self, MatchEnding::PlayerWon)
    }
}

/// Everything the table needs to know after a move settles.
///
/// `ending` is `Some` exactly when the move finished the match; there is no
/// separate "match ended" flag that could disagree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub round: RoundResult,
    #[serde(default)]
    pub ending: Option<MatchEnding>,
    #[serde(default)]
    pub expression: Option<ExpressionCue>,
}

impl MoveOutcome {
    pub fn continuing(round: RoundResult) -> Self {
        Self {
            round,
            ending: None,
            expression: None,
        }
    }

    pub fn ended(round: RoundResult, ending: MatchEnding) -> Self {
        Self {
            round,
            ending: Some(ending),
            expression: None,
        }
    }

    pub fn with_expression(mut self, cue: ExpressionCue) -> Self {
        self.expression = Some(cue);
        self
    }

    pub fn match_ended(&self) -> bool {
        self.ending.is_some()
    }

    /// `None` while the match continues.
    pub fn player_won(&self) -> Option<bool> {
        self.ending.map(MatchEnding::player_won)
    }
}
