use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// =============================================================================
// Choice
// =============================================================================

/// A hand played in a round of rock-paper-scissors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    /// Returns all choices in button order.
    pub fn all() -> [Choice; 3] {
        [Choice::Rock, Choice::Paper, Choice::Scissors]
    }

    /// Integer used by the game contract (1 = rock, 2 = paper, 3 = scissors).
    pub fn protocol_value(&self) -> u8 {
        match self {
            Choice::Rock => 1,
            Choice::Paper => 2,
            Choice::Scissors => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Choice::Rock => "ROCK",
            Choice::Paper => "PAPER",
            Choice::Scissors => "SCISSORS",
        }
    }

    /// The hand this choice defeats.
    pub fn beats(&self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Paper => Choice::Rock,
            Choice::Scissors => Choice::Paper,
        }
    }

    /// Classifies a round from the player's point of view.
    pub fn against(&self, tomie: Choice) -> Outcome {
        if *self == tomie {
            Outcome::Draw
        } else if self.beats() == tomie {
            Outcome::PlayerWins
        } else {
            Outcome::TomieWins
        }
    }
}

impl std::fmt::Display for Choice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl TryFrom<u8> for Choice {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Choice::Rock),
            2 => Ok(Choice::Paper),
            3 => Ok(Choice::Scissors),
            other => Err(DomainError::validation(format!("Unknown choice value: {other}"))),
        }
    }
}

impl FromStr for Choice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Choice::Rock),
            "paper" | "p" => Ok(Choice::Paper),
            "scissors" | "s" => Ok(Choice::Scissors),
            other => Err(DomainError::parse(format!("Unknown choice: {other}"))),
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Classification of a round result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Draw,
    PlayerWins,
    TomieWins,
}

impl Outcome {
    /// Integer used by the game contract (0 = draw, 1 = player, 2 = Tomie).
    pub fn protocol_value(&self) -> u8 {
        match self {
            Outcome::Draw => 0,
            Outcome::PlayerWins => 1,
            Outcome::TomieWins => 2,
        }
    }

    /// Banner shown over the hands during the result animation.
    pub fn banner(&self) -> &'static str {
        match self {
            Outcome::Draw => "DRAW!",
            Outcome::PlayerWins => "YOU WIN!",
            Outcome::TomieWins => "TOMIE WINS!",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Outcome::Draw => "DRAW",
            Outcome::PlayerWins => "PLAYER_WINS",
            Outcome::TomieWins => "TOMIE_WINS",
        };
        write!(f, "{name}")
    }
}

impl TryFrom<u8> for Outcome {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Draw),
            1 => Ok(Outcome::PlayerWins),
            2 => Ok(Outcome::TomieWins),
            other => Err(DomainError::validation(format!("Unknown outcome value: {other}"))),
        }
    }
}
