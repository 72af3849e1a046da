//! Home screen: connect the wallet, create a game, fade into the table.

use tomie_domain::{GameId, Route};

use super::effects::{Effect, Effects, Input};
use super::error::SessionError;
use super::fade::FadeController;
use super::screen::{Screen, ScreenView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub connected: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub fading: bool,
}

#[derive(Debug)]
pub struct HomeController {
    connected: bool,
    loading: bool,
    error: Option<SessionError>,
    fade: FadeController<Route>,
}

impl HomeController {
    pub fn new(connected: bool, fade_ms: u64) -> Self {
        Self {
            connected,
            loading: false,
            error: None,
            fade: FadeController::new(fade_ms),
        }
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    fn start(&mut self, effects: &mut Effects) {
        if self.loading || self.fade.is_fading() {
            tracing::debug!(loading = self.loading, "Ignoring start while busy");
            return;
        }
        self.loading = true;
        self.error = None;
        if self.connected {
            tracing::info!("Creating new game");
            effects.push(Effect::CreateGame);
        } else {
            tracing::info!("Connecting wallet");
            effects.push(Effect::ConnectWallet);
        }
    }

    fn game_created(&mut self, game_id: GameId, now_ms: u64) {
        self.loading = false;
        tracing::info!(game_id = %game_id, "Game created, fading to table");
        self.fade.begin(Route::Table(game_id), now_ms);
    }

    fn fail(&mut self, err: SessionError) {
        self.loading = false;
        if let Some(route) = self.fade.cancel() {
            tracing::warn!(route = %route, "Navigation cancelled");
        }
        self.error = Some(err);
    }
}

impl Screen for HomeController {
    fn route(&self) -> Route {
        Route::Home
    }

    fn enter(&mut self, _now_ms: u64) -> Effects {
        tracing::info!(connected = self.connected, "Entering home");
        Effects::new()
    }

    fn handle(&mut self, input: Input, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        match input {
            Input::Start => self.start(&mut effects),
            Input::WalletConnected(Ok(())) => {
                tracing::info!("Wallet connected, creating new game");
                self.connected = true;
                self.loading = true;
                effects.push(Effect::CreateGame);
            }
            Input::WalletConnected(Err(err)) => {
                tracing::error!(error = %err, "Wallet connection failed");
                self.fail(SessionError::Connection(format!("Error connecting wallet: {err}")));
            }
            Input::GameCreated(Ok(game_id)) => self.game_created(game_id, now_ms),
            Input::GameCreated(Err(err)) => {
                tracing::error!(error = %err, "Game creation failed");
                self.fail(SessionError::from_service("Failed to create new game", err));
            }
            Input::WalletLost => {
                tracing::warn!("Wallet session lost");
                self.connected = false;
                self.fail(SessionError::Connection("Wallet disconnected".to_string()));
            }
            Input::DismissError => self.error = None,
            other => tracing::debug!(input = ?other, "Ignoring input on home"),
        }
        effects
    }

    fn next_deadline(&self) -> Option<u64> {
        self.fade.next_deadline()
    }

    fn fire(&mut self, at_ms: u64) -> Effects {
        let mut effects = Effects::new();
        if let Some(route) = self.fade.fire(at_ms) {
            effects.push(Effect::Navigate(route));
        }
        effects
    }

    fn shutdown(&mut self) -> Effects {
        self.fade.cancel();
        Effects::new()
    }

    fn view(&self) -> ScreenView {
        ScreenView::Home(HomeView {
            connected: self.connected,
            loading: self.loading,
            error: self.error.as_ref().map(ToString::to_string),
            fading: self.fade.is_fading(),
        })
    }
}
