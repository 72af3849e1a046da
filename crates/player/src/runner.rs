//! Session runner
//!
//! Owns the active screen and executes the effects it emits against the
//! outbound ports. External calls run concurrently as futures on the runner's
//! task; their results come back to the screen as [`Input`]s. Screen deadlines
//! are measured in milliseconds since the runner started.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use rand::seq::SliceRandom;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tomie_domain::{Choice, MatchEnding, Route, Script};

use crate::application::{
    Effect, Effects, EndingScreen, GamePhaseMachine, HomeController, Input, Screen,
};
use crate::config::TimingConfig;
use crate::ports::outbound::{
    AudioPort, GameStatusPort, MovePort, NavigationPort, NewGamePort, PresenterPort, WalletPort,
};

/// Everything the runner talks to.
#[derive(Clone)]
pub struct SessionPorts {
    pub audio: Arc<dyn AudioPort>,
    pub wallet: Arc<dyn WalletPort>,
    pub new_game: Arc<dyn NewGamePort>,
    pub moves: Arc<dyn MovePort>,
    pub status: Arc<dyn GameStatusPort>,
    pub navigation: Arc<dyn NavigationPort>,
    pub presenter: Arc<dyn PresenterPort>,
}

/// Events delivered by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput {
    Click,
    Choose(Choice),
    Start,
    DismissError,
    /// The host noticed the wallet session dropped.
    WalletLost,
    Quit,
}

impl UserInput {
    fn into_input(self) -> Option<Input> {
        match self {
            UserInput::Click => Some(Input::Click),
            UserInput::Choose(choice) => Some(Input::Choose(choice)),
            UserInput::Start => Some(Input::Start),
            UserInput::DismissError => Some(Input::DismissError),
            UserInput::WalletLost => Some(Input::WalletLost),
            UserInput::Quit => None,
        }
    }
}

/// Result of an external call, tagged with the screen that asked for it.
type Pending = BoxFuture<'static, (u64, Input)>;

pub struct SessionRunner {
    ports: SessionPorts,
    timing: TimingConfig,
    script: Arc<Script>,
    origin: Instant,
    screen: Box<dyn Screen>,
    /// Bumped on every navigation so results for a previous screen are dropped.
    epoch: u64,
    pending: FuturesUnordered<Pending>,
}

impl SessionRunner {
    pub fn new(ports: SessionPorts, timing: TimingConfig, script: Arc<Script>, start: Route) -> Self {
        let screen = build_screen(start, &ports, &timing, &script);
        Self {
            ports,
            timing,
            script,
            origin: Instant::now(),
            screen,
            epoch: 0,
            pending: FuturesUnordered::new(),
        }
    }

    pub fn route(&self) -> Route {
        self.screen.route()
    }

    /// Drive the session until the input channel closes or `Quit` arrives.
    ///
    /// Returns the route that was active when the session ended.
    pub async fn run(mut self, mut inputs: mpsc::Receiver<UserInput>) -> Route {
        tracing::info!(route = %self.screen.route(), "Session started");
        self.ports.navigation.navigate(&self.screen.route());
        let now = self.now_ms();
        let effects = self.screen.enter(now);
        self.execute(effects);
        self.render();

        loop {
            let wake_at = self
                .screen
                .next_deadline()
                .map(|at| self.origin + Duration::from_millis(at));

            tokio::select! {
                user = inputs.recv() => {
                    let Some(input) = user.and_then(UserInput::into_input) else {
                        break;
                    };
                    let now = self.now_ms();
                    let effects = self.screen.handle(input, now);
                    self.execute(effects);
                }
                Some((epoch, input)) = self.pending.next(), if !self.pending.is_empty() => {
                    if epoch == self.epoch {
                        let now = self.now_ms();
                        let effects = self.screen.handle(input, now);
                        self.execute(effects);
                    } else {
                        tracing::debug!(input = ?input, "Dropping result for a previous screen");
                    }
                }
                _ = sleep_until(wake_at) => {
                    let now = self.now_ms();
                    let effects = self.screen.advance(now);
                    self.execute(effects);
                }
            }
            self.render();
        }

        let route = self.screen.route();
        tracing::info!(route = %route, "Session ended");
        let effects = self.screen.shutdown();
        self.execute(effects);
        route
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn render(&self) {
        self.ports.presenter.render(&self.screen.view());
    }

    fn spawn<F>(&mut self, call: F)
    where
        F: Future<Output = Input> + Send + 'static,
    {
        let epoch = self.epoch;
        self.pending.push(Box::pin(async move { (epoch, call.await) }));
    }

    fn execute(&mut self, effects: Effects) {
        for effect in effects {
            tracing::debug!(effect = ?effect, "Executing effect");
            match effect {
                Effect::LoadVoice { ticket, clip } => {
                    let audio = Arc::clone(&self.ports.audio);
                    self.spawn(async move {
                        let result = audio.load(&clip).await;
                        Input::VoiceLoaded { ticket, result }
                    });
                }
                Effect::StartVoice { clip, .. } => self.ports.audio.play(&clip),
                Effect::StopVoice => self.ports.audio.stop(),
                Effect::PlaySubmitJingle => {
                    match self.script.submit_jingles.choose(&mut rand::thread_rng()) {
                        Some(jingle) => self.ports.audio.play_effect(jingle),
                        None => tracing::debug!("No submission jingles configured"),
                    }
                }
                Effect::RestartMusic => self.ports.audio.restart_music(),
                Effect::ConnectWallet => {
                    let wallet = Arc::clone(&self.ports.wallet);
                    self.spawn(async move { Input::WalletConnected(wallet.connect().await) });
                }
                Effect::DisconnectWallet => self.ports.wallet.disconnect(),
                Effect::CreateGame => {
                    let service = Arc::clone(&self.ports.new_game);
                    self.spawn(async move { Input::GameCreated(service.create_game().await) });
                }
                Effect::SubmitMove { game_id, choice } => {
                    let service = Arc::clone(&self.ports.moves);
                    self.spawn(async move {
                        Input::MoveResolved(service.submit_move(game_id, choice).await)
                    });
                }
                Effect::FetchStatus { game_id } => {
                    let service = Arc::clone(&self.ports.status);
                    self.spawn(async move {
                        Input::StatusLoaded(service.fetch_status(game_id).await)
                    });
                }
                Effect::Navigate(route) => self.navigate(route),
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        tracing::info!(from = %self.screen.route(), to = %route, "Navigating");
        let teardown = self.screen.shutdown();
        self.execute(teardown);

        self.epoch += 1;
        self.ports.navigation.navigate(&route);
        self.screen = build_screen(route, &self.ports, &self.timing, &self.script);
        let now = self.now_ms();
        let effects = self.screen.enter(now);
        self.execute(effects);
    }
}

fn build_screen(
    route: Route,
    ports: &SessionPorts,
    timing: &TimingConfig,
    script: &Arc<Script>,
) -> Box<dyn Screen> {
    match route {
        Route::Home => Box::new(HomeController::new(
            ports.wallet.is_connected(),
            timing.fade_ms,
        )),
        Route::Table(game_id) => Box::new(GamePhaseMachine::new(
            game_id,
            timing.clone(),
            Arc::clone(script),
        )),
        Route::Victory => Box::new(EndingScreen::new(
            MatchEnding::PlayerWon,
            timing.clone(),
            Arc::clone(script),
        )),
        Route::Defeat => Box::new(EndingScreen::new(
            MatchEnding::PlayerLost,
            timing.clone(),
            Arc::clone(script),
        )),
    }
}

async fn sleep_until(at: Option<Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
