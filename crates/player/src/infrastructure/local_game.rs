//! Offline game service
//!
//! Plays Tomie's side locally: random hands, a life lost per round lost, and
//! the match ends when either side runs out of lives. Stands in for the
//! on-chain game contract so the client can be played without a wallet
//! provider or RPC node.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tomie_domain::{
    Choice, ExpressionCue, GameId, GameStatus, MatchEnding, MoveOutcome, Outcome, RoundResult,
};

use crate::ports::outbound::{GameStatusPort, MovePort, NewGamePort, ServiceError, WalletPort};

/// Tomie smirks when she takes a life and scowls when she loses one.
const SMIRK: ExpressionCue = ExpressionCue(1);
const SCOWL: ExpressionCue = ExpressionCue(2);

#[derive(Debug, Clone, Copy)]
struct LocalGame {
    lives: u8,
    tomie_lives: u8,
    round: u32,
}

impl LocalGame {
    fn in_progress(&self) -> bool {
        self.lives > 0 && self.tomie_lives > 0
    }

    fn status(&self, game_id: GameId) -> GameStatus {
        GameStatus {
            game_id,
            lives: self.lives,
            tomie_lives: self.tomie_lives,
            current_minigame: self.round,
            in_progress: self.in_progress(),
        }
    }
}

struct LocalState {
    games: HashMap<GameId, LocalGame>,
    last_id: u64,
    rng: StdRng,
}

pub struct LocalGameService {
    starting_lives: u8,
    wallet: Arc<dyn WalletPort>,
    state: Mutex<LocalState>,
}

impl LocalGameService {
    pub fn new(starting_lives: u8, wallet: Arc<dyn WalletPort>) -> Self {
        Self::with_rng(starting_lives, wallet, StdRng::from_entropy())
    }

    /// Deterministic opponent for tests and replays.
    pub fn with_seed(starting_lives: u8, wallet: Arc<dyn WalletPort>, seed: u64) -> Self {
        Self::with_rng(starting_lives, wallet, StdRng::seed_from_u64(seed))
    }

    fn with_rng(starting_lives: u8, wallet: Arc<dyn WalletPort>, rng: StdRng) -> Self {
        Self {
            starting_lives: starting_lives.max(1),
            wallet,
            state: Mutex::new(LocalState {
                games: HashMap::new(),
                last_id: 0,
                rng,
            }),
        }
    }

    fn require_wallet(&self) -> Result<(), ServiceError> {
        if self.wallet.is_connected() {
            Ok(())
        } else {
            Err(ServiceError::NotConnected)
        }
    }
}

#[async_trait]
impl NewGamePort for LocalGameService {
    async fn create_game(&self) -> Result<GameId, ServiceError> {
        self.require_wallet()?;
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let game_id = GameId::new(state.last_id);
        state.games.insert(
            game_id,
            LocalGame {
                lives: self.starting_lives,
                tomie_lives: self.starting_lives,
                round: 1,
            },
        );
        tracing::info!(game_id = %game_id, lives = self.starting_lives, "Local game created");
        Ok(game_id)
    }
}

#[async_trait]
impl MovePort for LocalGameService {
    async fn submit_move(
        &self,
        game_id: GameId,
        choice: Choice,
    ) -> Result<MoveOutcome, ServiceError> {
        self.require_wallet()?;
        let mut state = self.state.lock().await;
        let LocalState { games, rng, .. } = &mut *state;

        let game = games
            .get_mut(&game_id)
            .ok_or_else(|| ServiceError::Transaction(format!("Game {game_id} not found")))?;
        if !game.in_progress() {
            return Err(ServiceError::Transaction(format!("Game {game_id} is over")));
        }

        let tomie_choice = Choice::all()
            .choose(rng)
            .copied()
            .ok_or_else(|| ServiceError::InvalidResponse("No hand to play".to_string()))?;
        let round = RoundResult::played(choice, tomie_choice);

        let expression = match round.outcome {
            Outcome::TomieWins => {
                game.lives = game.lives.saturating_sub(1);
                Some(SMIRK)
            }
            Outcome::PlayerWins => {
                game.tomie_lives = game.tomie_lives.saturating_sub(1);
                Some(SCOWL)
            }
            Outcome::Draw => None,
        };
        game.round += 1;

        let mut outcome = if game.lives == 0 {
            MoveOutcome::ended(round, MatchEnding::PlayerLost)
        } else if game.tomie_lives == 0 {
            MoveOutcome::ended(round, MatchEnding::PlayerWon)
        } else {
            MoveOutcome::continuing(round)
        };
        if let Some(cue) = expression {
            outcome = outcome.with_expression(cue);
        }

        tracing::info!(
            game_id = %game_id,
            player = %choice,
            tomie = %tomie_choice,
            outcome = %round.outcome,
            lives = game.lives,
            tomie_lives = game.tomie_lives,
            "Local round played"
        );
        Ok(outcome)
    }
}

#[async_trait]
impl GameStatusPort for LocalGameService {
    async fn fetch_status(&self, game_id: GameId) -> Result<GameStatus, ServiceError> {
        let state = self.state.lock().await;
        state
            .games
            .get(&game_id)
            .map(|game| game.status(game_id))
            .ok_or_else(|| ServiceError::InvalidResponse(format!("Game {game_id} not indexed")))
    }
}
