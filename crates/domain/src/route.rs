use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::GameId;

/// Client screens addressable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    Table(GameId),
    Victory,
    Defeat,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Table(game_id) => format!("/game/{game_id}"),
            Route::Victory => "/victory".to_string(),
            Route::Defeat => "/defeat".to_string(),
        }
    }

    /// Screen shown once a match has been decided.
    pub fn for_match_result(player_won: bool) -> Self {
        if player_won {
            Route::Victory
        } else {
            Route::Defeat
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        match path.trim_end_matches('/') {
            "" => Ok(Route::Home),
            "/victory" => Ok(Route::Victory),
            "/defeat" => Ok(Route::Defeat),
            other => match other.strip_prefix("/game/") {
                Some(id) => Ok(Route::Table(id.parse()?)),
                None => Err(DomainError::parse(format!("Unknown route: {path}"))),
            },
        }
    }
}
