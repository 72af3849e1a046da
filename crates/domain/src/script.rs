//! Narrative script
//!
//! All text Tomie speaks, grouped by the phase or screen that narrates it.
//! The built-in script is returned by [`Script::default`]; a custom one can be
//! deserialized from JSON for localization or testing.

use serde::{Deserialize, Serialize};

use crate::choice::Outcome;
use crate::dialogue::{DialogueLine, DialogueSet};
use crate::round::MatchEnding;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeLines {
    pub draw: DialogueSet,
    pub player_wins: DialogueSet,
    pub tomie_wins: DialogueSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingLines {
    pub player_won: DialogueSet,
    pub player_lost: DialogueSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Table intro, narrated before the first choice.
    pub intro: DialogueSet,
    /// Narrated after each round, keyed by outcome.
    pub results: OutcomeLines,
    /// Narrated on the table once the match is decided.
    pub game_end: EndingLines,
    /// Victory screen monologue.
    pub victory: DialogueSet,
    /// Defeat screen monologue.
    pub defeat: DialogueSet,
    /// "Jan-ken-pon" sounds, one picked at random per submission.
    #[serde(default)]
    pub submit_jingles: Vec<String>,
}

impl Script {
    pub fn result_lines(&self, outcome: Outcome) -> &DialogueSet {
        match outcome {
            Outcome::Draw => &self.results.draw,
            Outcome::PlayerWins => &self.results.player_wins,
            Outcome::TomieWins => &self.results.tomie_wins,
        }
    }

    pub fn game_end_lines(&self, ending: MatchEnding) -> &DialogueSet {
        match ending {
            MatchEnding::PlayerWon => &self.game_end.player_won,
            MatchEnding::PlayerLost => &self.game_end.player_lost,
        }
    }

    pub fn ending_screen_lines(&self, ending: MatchEnding) -> &DialogueSet {
        match ending {
            MatchEnding::PlayerWon => &self.victory,
            MatchEnding::PlayerLost => &self.defeat,
        }
    }
}

fn voiced(text: &str, clip: &str) -> DialogueLine {
    DialogueLine::voiced(text, clip)
}

impl Default for Script {
    fn default() -> Self {
        Self {
            intro: DialogueSet::new(vec![
                voiced(
                    "Tomie: We're going to play rock, paper, scissors. Simple, right?",
                    "/voices/intro_1.mp3",
                ),
                voiced(
                    "Tomie: But there's something more to this game than meets the eye. Let's see what happens...",
                    "/voices/intro_2.mp3",
                ),
                voiced("Tomie: What do you choose?", "/voices/intro_3.mp3"),
            ]),
            results: OutcomeLines {
                draw: DialogueSet::new(vec![
                    voiced(
                        "Tomie: A draw? How interesting... This means we're evenly matched.",
                        "/voices/draw_1.mp3",
                    ),
                    voiced(
                        "Tomie: But don't think this is over. The real game has just begun.",
                        "/voices/draw_2.mp3",
                    ),
                ]),
                player_wins: DialogueSet::new(vec![
                    voiced("Tomie: You won this round...", "/voices/player_wins_1.mp3"),
                    voiced(
                        "Tomie: But remember, winning doesn't always mean you're safe. Sometimes victory comes with a price.",
                        "/voices/player_wins_2.mp3",
                    ),
                ]),
                tomie_wins: DialogueSet::new(vec![
                    voiced("Tomie: I win this round.", "/voices/tomie_wins_1.mp3"),
                    voiced(
                        "Tomie: You lose a life, but don't worry... there's still more to come. The game isn't over yet.",
                        "/voices/tomie_wins_2.mp3",
                    ),
                ]),
            },
            game_end: EndingLines {
                player_won: DialogueSet::new(vec![
                    voiced(
                        "Tomie: No... that can't be. You actually beat me.",
                        "/voices/game_won_1.mp3",
                    ),
                    voiced(
                        "Tomie: Fine. Go, while the door is still open.",
                        "/voices/game_won_2.mp3",
                    ),
                ]),
                player_lost: DialogueSet::new(vec![
                    voiced(
                        "Tomie: That was your last life. I told you the game wasn't over.",
                        "/voices/game_lost_1.mp3",
                    ),
                    voiced("Tomie: Now you belong to me.", "/voices/game_lost_2.mp3"),
                ]),
            },
            victory: DialogueSet::new(vec![voiced(
                "Tomie: You've won... this time. But remember, victory doesn't always mean you're free.",
                "/voices/victory.mp3",
            )]),
            defeat: DialogueSet::new(vec![voiced(
                "Tomie: You haven't been the only victim here... And you'll remain here for eternity, with me.",
                "/voices/defeat.mp3",
            )]),
            submit_jingles: vec![
                "/music/jankenpon_1.mp3".to_string(),
                "/music/jankenpon_2.mp3".to_string(),
                "/music/jankenpon_3.mp3".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_outcome_has_lines() {
        let script = Script::default();
        for outcome in [Outcome::Draw, Outcome::PlayerWins, Outcome::TomieWins] {
            assert!(!script.result_lines(outcome).is_empty(), "{outcome}");
        }
    }

    #[test]
    fn endings_branch_on_the_winner() {
        let script = Script::default();
        assert_ne!(
            script.game_end_lines(MatchEnding::PlayerWon),
            script.game_end_lines(MatchEnding::PlayerLost)
        );
        assert_eq!(script.ending_screen_lines(MatchEnding::PlayerLost), &script.defeat);
    }

    #[test]
    fn built_in_script_survives_json() {
        let script = Script::default();
        let json = serde_json::to_string(&script).expect("serialize");
        let back: Script = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, script);
    }
}
