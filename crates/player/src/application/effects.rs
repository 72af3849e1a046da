//! Effects and inputs exchanged between screens and the session runner
//!
//! Screens never perform I/O. They react to [`Input`]s and deadlines by
//! mutating their own state and appending [`Effect`]s, which the runner then
//! executes against the outbound ports in emission order.

use tomie_domain::{Choice, GameId, GameStatus, MoveOutcome, Route, VoiceClip};

use crate::application::voice::VoiceTicket;
use crate::ports::outbound::{AudioError, ServiceError};

/// Side effect requested by a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Begin loading a voice clip; the result comes back as `Input::VoiceLoaded`.
    LoadVoice { ticket: VoiceTicket, clip: VoiceClip },
    /// Make a loaded clip audible.
    StartVoice { ticket: VoiceTicket, clip: VoiceClip },
    /// Silence the current voice clip.
    StopVoice,
    /// Play one of the submission jingles at random.
    PlaySubmitJingle,
    RestartMusic,
    ConnectWallet,
    DisconnectWallet,
    CreateGame,
    SubmitMove { game_id: GameId, choice: Choice },
    FetchStatus { game_id: GameId },
    Navigate(Route),
}

/// Ordered effect buffer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Effects(Vec<Effect>);

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    pub fn append(&mut self, other: &mut Effects) {
        self.0.append(&mut other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.0.iter()
    }

    pub fn contains(&self, effect: &Effect) -> bool {
        self.0.contains(effect)
    }

    /// Index of the first effect matching `pred`.
    pub fn position(&self, pred: impl Fn(&Effect) -> bool) -> Option<usize> {
        self.0.iter().position(pred)
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Something that happened outside the screen: a user gesture or the
/// completion of an external call.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Click on the dialogue box.
    Click,
    /// Click on one of the rock/paper/scissors buttons.
    Choose(Choice),
    /// Click on the home menu entry.
    Start,
    /// Close the error banner.
    DismissError,
    WalletConnected(Result<(), ServiceError>),
    /// The wallet session dropped unexpectedly.
    WalletLost,
    GameCreated(Result<GameId, ServiceError>),
    MoveResolved(Result<MoveOutcome, ServiceError>),
    StatusLoaded(Result<GameStatus, ServiceError>),
    VoiceLoaded {
        ticket: VoiceTicket,
        result: Result<f64, AudioError>,
    },
}
