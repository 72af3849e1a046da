//! Tomie Domain - the shared vocabulary of the Tomie Games client.
//!
//! Pure data and rules: phases and their transitions, hands and outcomes,
//! dialogue lines, round results, routes, and the narrative script.
//! Nothing in here performs I/O or knows about time.

pub mod choice;
pub mod dialogue;
pub mod error;
pub mod ids;
pub mod phase;
pub mod round;
pub mod route;
pub mod script;
pub mod status;

pub use choice::{Choice, Outcome};
pub use dialogue::{DialogueLine, DialogueSet, VoiceClip};
pub use error::DomainError;
pub use ids::GameId;
pub use phase::Phase;
pub use round::{ExpressionCue, MatchEnding, MoveOutcome, RoundResult};
pub use route::Route;
pub use script::{EndingLines, OutcomeLines, Script};
pub use status::GameStatus;
