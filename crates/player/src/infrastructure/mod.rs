//! Infrastructure adapters for the outbound ports

pub mod audio;
pub mod local_game;
pub mod navigation;
pub mod terminal;
pub mod wallet;

pub use audio::ManifestAudio;
pub use local_game::LocalGameService;
pub use navigation::HistoryNavigator;
pub use terminal::{spawn_stdin_reader, TerminalPresenter};
pub use wallet::LocalWallet;
