//! In-process wallet session for offline play

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::ports::outbound::{ServiceError, WalletPort};

#[derive(Debug, Default)]
pub struct LocalWallet {
    connected: AtomicBool,
}

impl LocalWallet {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }
}

#[async_trait]
impl WalletPort for LocalWallet {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn connect(&self) -> Result<(), ServiceError> {
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!("Wallet session opened");
        Ok(())
    }

    fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            tracing::info!("Wallet session closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_then_disconnect() {
        let wallet = LocalWallet::default();
        assert!(!wallet.is_connected());

        wallet.connect().await.expect("local connect never fails");
        assert!(wallet.is_connected());

        wallet.disconnect();
        wallet.disconnect();
        assert!(!wallet.is_connected());
    }
}
