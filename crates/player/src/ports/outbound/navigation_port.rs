//! Navigation Port - notifies the host shell of route changes

use tomie_domain::Route;

/// The runner swaps screens itself; this port only mirrors the change into
/// the host (browser history, window title, logs).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait NavigationPort: Send + Sync {
    fn navigate(&self, route: &Route);
}
