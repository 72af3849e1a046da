//! Application layer - the sans-IO orchestration core
//!
//! Screens and the components they are built from react to inputs and explicit
//! timestamps, and describe the I/O they need as [`Effect`]s.

pub mod dialogue;
pub mod effects;
pub mod ending;
pub mod error;
pub mod fade;
pub mod home;
pub mod phase_machine;
pub mod screen;
pub mod typewriter;
pub mod voice;

pub use dialogue::{DialogueSequencer, DialogueTiming, SequencerEvent};
pub use effects::{Effect, Effects, Input};
pub use ending::{EndingScreen, EndingView};
pub use error::SessionError;
pub use fade::FadeController;
pub use home::{HomeController, HomeView};
pub use phase_machine::{GamePhaseMachine, TableView};
pub use screen::{Screen, ScreenView};
pub use typewriter::{Typewriter, TypewriterStep};
pub use voice::{VoiceCoordinator, VoiceTicket};
