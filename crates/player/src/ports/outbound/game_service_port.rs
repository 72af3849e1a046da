//! Game service ports - on-chain game actions and reads
//!
//! Transaction submission and event decoding live behind these traits; the
//! client core only ever sees typed results.

use async_trait::async_trait;
use tomie_domain::{Choice, GameId, GameStatus, MoveOutcome};

/// Failure of an external game service call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// No wallet/account available for an action that needs one
    #[error("Connect with controller")]
    NotConnected,
    /// The chain rejected or reverted the transaction
    #[error("Tx failed: {0}")]
    Transaction(String),
    /// Transport failure (RPC, indexer)
    #[error("Network error: {0}")]
    Network(String),
    /// The call succeeded but its events/result could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Port for starting a new match.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NewGamePort: Send + Sync {
    /// Create a game for the connected account and return its id.
    async fn create_game(&self) -> Result<GameId, ServiceError>;
}

/// Port for playing a hand.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MovePort: Send + Sync {
    /// Submit a move and wait for the round to settle.
    ///
    /// The returned outcome is authoritative: it decides the result dialogue,
    /// whether the match ended and who won.
    async fn submit_move(&self, game_id: GameId, choice: Choice)
        -> Result<MoveOutcome, ServiceError>;
}

/// Read-only status of a game (lives, round counter).
///
/// Reads may lag behind writes, so callers refetch after a short delay rather
/// than trusting optimistic state.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GameStatusPort: Send + Sync {
    async fn fetch_status(&self, game_id: GameId) -> Result<GameStatus, ServiceError>;
}
