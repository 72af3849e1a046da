use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Stage of the table screen.
///
/// Transitions only move forward, except for the round loop
/// `ResultDialogues -> Choices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Choices,
    ResultAnimation,
    ResultDialogues,
    GameEnded,
}

impl Phase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Intro => "Intro",
            Phase::Choices => "Choices",
            Phase::ResultAnimation => "Result animation",
            Phase::ResultDialogues => "Result dialogues",
            Phase::GameEnded => "Game ended",
        }
    }

    pub fn can_transition_to(&self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Intro, Phase::Choices)
                | (Phase::Choices, Phase::ResultAnimation)
                | (Phase::ResultAnimation, Phase::ResultDialogues)
                | (Phase::ResultDialogues, Phase::Choices)
                | (Phase::ResultDialogues, Phase::GameEnded)
        )
    }

    /// Validates a transition, returning the next phase.
    pub fn transition_to(&self, next: Phase) -> Result<Phase, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::invalid_state_transition(format!(
                "{} -> {}",
                self.display_name(),
                next.display_name()
            )))
        }
    }

    /// Whether dialogue clicks are meaningful in this phase.
    pub fn has_dialogue(&self) -> bool {
        matches!(self, Phase::Intro | Phase::ResultDialogues | Phase::GameEnded)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Phase; 5] = [
        Phase::Intro,
        Phase::Choices,
        Phase::ResultAnimation,
        Phase::ResultDialogues,
        Phase::GameEnded,
    ];

    #[test]
    fn allowed_transitions() {
        let allowed = [
            (Phase::Intro, Phase::Choices),
            (Phase::Choices, Phase::ResultAnimation),
            (Phase::ResultAnimation, Phase::ResultDialogues),
            (Phase::ResultDialogues, Phase::Choices),
            (Phase::ResultDialogues, Phase::GameEnded),
        ];

        for from in ALL {
            for to in ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn game_ended_is_terminal() {
        for to in ALL {
            assert!(Phase::GameEnded.transition_to(to).is_err());
        }
    }

    #[test]
    fn rejected_transition_names_both_phases() {
        let err = Phase::Intro
            .transition_to(Phase::GameEnded)
            .expect_err("intro cannot end the game");
        assert_eq!(err.to_string(), "Invalid state transition: Intro -> Game ended");
    }
}
