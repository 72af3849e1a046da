//! Tomie player - terminal composition root.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tomie_domain::{Route, Script};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tomie_player::application::SessionError;
use tomie_player::infrastructure::{
    spawn_stdin_reader, terminal, HistoryNavigator, LocalGameService, LocalWallet, ManifestAudio,
    TerminalPresenter,
};
use tomie_player::ports::outbound::WalletPort;
use tomie_player::{PlayerConfig, SessionPorts, SessionRunner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tomie_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Tomie player");

    let config = PlayerConfig::from_env().context("Failed to load player configuration")?;
    let script = match &config.script_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            serde_json::from_str::<Script>(&raw)
                .with_context(|| format!("Failed to parse script {}", path.display()))?
        }
        None => Script::default(),
    };

    let audio = match &config.voice_manifest {
        Some(path) => ManifestAudio::from_file(path),
        None => ManifestAudio::default(),
    };
    let wallet: Arc<dyn WalletPort> = Arc::new(LocalWallet::default());
    let games = Arc::new(LocalGameService::new(
        config.starting_lives,
        Arc::clone(&wallet),
    ));

    let ports = SessionPorts {
        audio: Arc::new(audio),
        wallet,
        new_game: games.clone(),
        moves: games.clone(),
        status: games,
        navigation: Arc::new(HistoryNavigator::new()),
        presenter: Arc::new(TerminalPresenter::new()),
    };

    let start = start_route(std::env::args().nth(1).or(config.start_route.clone()));
    let runner = SessionRunner::new(ports, config.timing.clone(), Arc::new(script), start);

    println!("{}", terminal::HELP);
    let (tx, rx) = mpsc::channel(32);
    let reader = spawn_stdin_reader(tx);
    let last = runner.run(rx).await;
    reader.abort();

    tracing::info!(route = %last, "Goodbye");
    Ok(())
}

fn start_route(raw: Option<String>) -> Route {
    let Some(raw) = raw else {
        return Route::Home;
    };
    match raw.parse::<Route>() {
        Ok(route) => route,
        Err(e) => {
            let err = SessionError::from(e);
            tracing::warn!("Ignoring start route {:?}: {}", raw, err);
            Route::Home
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
