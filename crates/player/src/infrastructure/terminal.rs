//! Terminal shell: prints screen snapshots and reads commands from stdin

use std::sync::Mutex;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tomie_domain::Choice;

use crate::application::ScreenView;
use crate::ports::outbound::PresenterPort;
use crate::runner::UserInput;

pub const HELP: &str =
    "Commands: <enter>/c click | r/p/s choose | start | x dismiss error | q quit";

/// Prints a frame whenever the visible state changes.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    last_frame: Mutex<String>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresenterPort for TerminalPresenter {
    fn render(&self, view: &ScreenView) {
        let frame = describe(view);
        let Ok(mut last) = self.last_frame.lock() else {
            return;
        };
        if *last != frame {
            println!("{frame}");
            *last = frame;
        }
    }
}

/// One-block text rendering of a view.
pub fn describe(view: &ScreenView) -> String {
    let mut out = match view {
        ScreenView::Home(home) => {
            let wallet = if home.connected { "connected" } else { "not connected" };
            let action = if home.loading { "working..." } else { "type `start` to play" };
            format!("== Tomie ==\nwallet {wallet} | {action}")
        }
        ScreenView::Table(table) => {
            let mut out = format!("== Table {} | {} ==", table.game_id, table.phase);
            if let Some(status) = &table.status {
                out.push_str(&format!("\n{}", status.summary()));
            }
            if let Some(round) = &table.round {
                out.push_str(&format!(
                    "\nYou: {} | Tomie: {}",
                    round.player_choice, round.tomie_choice
                ));
                if table.hands_settled {
                    out.push_str(&format!(" | {}", round.outcome.banner()));
                }
            }
            if let Some(cue) = table.expression {
                out.push_str(&format!("\n(Tomie's expression changes: {})", cue.id()));
            }
            if !table.text.is_empty() {
                let cursor = if table.text_complete { "" } else { "|" };
                out.push_str(&format!("\n> {}{cursor}", table.text));
            }
            if !table.choices.is_empty() {
                let names: Vec<&str> = table.choices.iter().map(Choice::display_name).collect();
                out.push_str(&format!("\n[{}]", names.join("] [")));
            }
            out
        }
        ScreenView::Ending(ending) => {
            let cursor = if ending.text_complete { "" } else { "|" };
            format!("== {:?} ==\n> {}{cursor}", ending.ending, ending.text)
        }
    };

    if let Some(error) = view.error() {
        out.push_str(&format!("\n!! {error} (x to dismiss)"));
    }
    if view.is_fading() {
        out.push_str("\n...");
    }
    out
}

/// Map a typed command to a user input. Unknown commands return `None`.
pub fn parse_command(line: &str) -> Option<UserInput> {
    let command = line.trim().to_ascii_lowercase();
    match command.as_str() {
        "" | "c" | "click" => Some(UserInput::Click),
        "start" => Some(UserInput::Start),
        "x" | "dismiss" => Some(UserInput::DismissError),
        "q" | "quit" | "exit" => Some(UserInput::Quit),
        other => other.parse::<Choice>().ok().map(UserInput::Choose),
    }
}

/// Forward stdin commands to the runner until stdin closes or the runner stops.
pub fn spawn_stdin_reader(tx: mpsc::Sender<UserInput>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_command(&line) {
                    Some(input) => {
                        let quit = input == UserInput::Quit;
                        if tx.send(input).await.is_err() || quit {
                            break;
                        }
                    }
                    None => println!("{HELP}"),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    })
}
