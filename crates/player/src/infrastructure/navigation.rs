//! Navigation adapter that keeps the visited routes

use std::sync::RwLock;

use tomie_domain::Route;

use crate::ports::outbound::NavigationPort;

#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: RwLock<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history
            .read()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    pub fn current(&self) -> Option<Route> {
        self.history
            .read()
            .ok()
            .and_then(|history| history.last().copied())
    }
}

impl NavigationPort for HistoryNavigator {
    fn navigate(&self, route: &Route) {
        tracing::info!(path = %route, "Navigate");
        match self.history.write() {
            Ok(mut history) => history.push(*route),
            Err(e) => tracing::error!("Navigation history lock poisoned: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tomie_domain::GameId;

    #[test]
    fn records_routes_in_order() {
        let nav = HistoryNavigator::new();
        assert_eq!(nav.current(), None);

        nav.navigate(&Route::Table(GameId::new(4)));
        nav.navigate(&Route::Victory);

        assert_eq!(
            nav.history(),
            vec![Route::Table(GameId::new(4)), Route::Victory]
        );
        assert_eq!(nav.current(), Some(Route::Victory));
    }
}
