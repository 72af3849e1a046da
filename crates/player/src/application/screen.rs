//! Screen abstraction driven by the session runner

use tomie_domain::Route;

use super::effects::{Effects, Input};
use super::ending::EndingView;
use super::home::HomeView;
use super::phase_machine::TableView;

/// Presentation snapshot of the active screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenView {
    Home(HomeView),
    Table(TableView),
    Ending(EndingView),
}

impl ScreenView {
    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenView::Home(view) => view.error.as_deref(),
            ScreenView::Table(view) => view.error.as_deref(),
            ScreenView::Ending(_) => None,
        }
    }

    pub fn is_fading(&self) -> bool {
        match self {
            ScreenView::Home(view) => view.fading,
            ScreenView::Table(view) => view.fading,
            ScreenView::Ending(view) => view.fading,
        }
    }
}

/// A screen owns its state and every deadline it scheduled.
///
/// All methods take the current session time explicitly; nothing here reads a
/// clock or performs I/O.
pub trait Screen: Send {
    fn route(&self) -> Route;

    /// Called once when the screen becomes active.
    fn enter(&mut self, now_ms: u64) -> Effects;

    fn handle(&mut self, input: Input, now_ms: u64) -> Effects;

    /// Earliest pending deadline, if any.
    fn next_deadline(&self) -> Option<u64>;

    /// Run the work due at `at_ms`. Must consume at least one deadline when
    /// one is due.
    fn fire(&mut self, at_ms: u64) -> Effects;

    /// Fire every deadline up to `now_ms` in chronological order.
    fn advance(&mut self, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        while let Some(due) = self.next_deadline().filter(|due| *due <= now_ms) {
            let mut fired = self.fire(due);
            effects.append(&mut fired);
        }
        effects
    }

    /// Drop every pending deadline and silence audio before the screen is left.
    fn shutdown(&mut self) -> Effects;

    fn view(&self) -> ScreenView;
}
