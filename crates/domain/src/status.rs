use serde::{Deserialize, Serialize};

use crate::ids::GameId;

/// Read model of a game as indexed from the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub game_id: GameId,
    pub lives: u8,
    pub tomie_lives: u8,
    pub current_minigame: u32,
    pub in_progress: bool,
}

impl GameStatus {
    pub fn summary(&self) -> String {
        format!(
            "Lives {} | Tomie {} | Round {}",
            self.lives, self.tomie_lives, self.current_minigame
        )
    }
}
