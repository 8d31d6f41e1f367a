use anyhow::Result;
use clap::Parser;

mod app;
mod client;
mod config;
mod handler;
mod linkify;
mod logging;
mod tui;
mod ui;

use app::App;
use config::Config;

#[derive(Parser)]
#[command(name = "causerie")]
#[command(about = "Terminal chat client for a causerie chatbot server")]
struct Cli {
    /// Chat server base URL
    #[arg(short, long)]
    server: Option<String>,

    /// Pacing delay in milliseconds before each chat request (0 disables)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Persist the given --server / --delay-ms to the config file
    #[arg(long)]
    save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = logging::init()?;

    let mut config = Config::load().unwrap_or_else(|_| Config::new());
    if let Some(server) = cli.server {
        config.server_url = Some(server);
    }
    if let Some(delay) = cli.delay_ms {
        config.send_delay_ms = Some(delay);
    }
    if cli.save {
        config.save()?;
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(config);

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
