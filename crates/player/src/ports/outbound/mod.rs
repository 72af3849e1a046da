//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the session runner to interact with external systems without
//! depending on concrete implementations.

pub mod audio_port;
pub mod game_service_port;
pub mod navigation_port;
pub mod presenter_port;
pub mod wallet_port;

pub use audio_port::{AudioError, AudioPort};
pub use game_service_port::{GameStatusPort, MovePort, NewGamePort, ServiceError};
pub use navigation_port::NavigationPort;
pub use presenter_port::PresenterPort;
pub use wallet_port::WalletPort;

#[cfg(any(test, feature = "testing"))]
pub use audio_port::MockAudioPort;
#[cfg(any(test, feature = "testing"))]
pub use game_service_port::{MockGameStatusPort, MockMovePort, MockNewGamePort};
#[cfg(any(test, feature = "testing"))]
pub use navigation_port::MockNavigationPort;
#[cfg(any(test, feature = "testing"))]
pub use presenter_port::MockPresenterPort;
#[cfg(any(test, feature = "testing"))]
pub use wallet_port::MockWalletPort;
