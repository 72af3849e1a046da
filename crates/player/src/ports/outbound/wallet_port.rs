//! Wallet Port - account session used to sign game transactions

use async_trait::async_trait;

use super::ServiceError;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait WalletPort: Send + Sync {
    /// Whether an account is currently available.
    fn is_connected(&self) -> bool;

    /// Open (or restore) the wallet session.
    async fn connect(&self) -> Result<(), ServiceError>;

    /// Drop the wallet session. No-op when already disconnected.
    fn disconnect(&self);
}
