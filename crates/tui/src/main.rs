use std::fs::File;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use relaychat_conversations::{HttpRelayClient, MockRelayClient, RelayClient, DEFAULT_RELAY_URL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "chat")]
#[command(about = "Terminal chat with an AI assistant through the Relaychat relay")]
struct Cli {
    /// Base URL of the relay service
    #[arg(long, env = "RELAY_URL", default_value = DEFAULT_RELAY_URL)]
    relay_url: String,

    /// Answer locally with canned echoes instead of calling the relay
    #[arg(long)]
    mock: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the UI, so logs go to a file
    let log_path = std::env::temp_dir().join("relaychat-chat.log");
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relaychat=debug,relaychat_tui=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();

    let client: Arc<dyn RelayClient> = if cli.mock {
        Arc::new(MockRelayClient::new())
    } else {
        Arc::new(HttpRelayClient::new(&cli.relay_url))
    };
    tracing::info!(relay_url = %cli.relay_url, mock = cli.mock, "Starting chat client");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new();
    let mut app = App::new(client, events.sender(), cli.relay_url);

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}
