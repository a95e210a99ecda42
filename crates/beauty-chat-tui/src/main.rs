use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use beauty_chat_core::config::ENDPOINT_ENV;
use beauty_chat_core::{ChatSession, Config, HttpCompletionClient};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod app;
mod console;
mod handler;
mod tui;
mod ui;

use app::App;
use console::ConsoleSink;

#[derive(Parser)]
#[command(name = "beauty-chat")]
#[command(about = "Chat with the L'Oréal beauty assistant from your terminal")]
#[command(version)]
struct Cli {
    /// Completion endpoint URL (overrides the config file)
    #[arg(long, env = ENDPOINT_ENV, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the exchange
    Ask {
        /// Your question
        question: String,
    },
    /// Save the completion endpoint to the config file
    Config {
        /// Endpoint URL, e.g. https://your-worker.workers.dev/
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging()?;

    match cli.command {
        Some(Commands::Config { url }) => {
            let path = Config::save_endpoint(&url)?;
            println!("Saved endpoint to {}", path.display().to_string().bold());
            Ok(())
        }
        Some(Commands::Ask { question }) => {
            let endpoint = Config::resolve(cli.endpoint.as_deref())?;
            ask(&endpoint, &question).await
        }
        None => {
            let endpoint = Config::resolve(cli.endpoint.as_deref())?;
            run_tui(&endpoint).await
        }
    }
}

fn log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(data_dir.join("beauty-chat"))
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging() -> Result<WorkerGuard> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, "beauty-chat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("beauty_chat=info,beauty_chat_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

async fn ask(endpoint: &str, question: &str) -> Result<()> {
    let client = HttpCompletionClient::new(endpoint);
    let mut sink = ConsoleSink::stdout();
    let mut session = ChatSession::open(&mut sink);

    info!(endpoint = client.endpoint(), model = client.model(), "one-shot ask");
    if session.submit(question, &client, &mut sink).await.is_none() {
        return Err(anyhow!("question is empty"));
    }
    Ok(())
}

async fn run_tui(endpoint: &str) -> Result<()> {
    let client = Arc::new(HttpCompletionClient::new(endpoint));
    info!(endpoint = client.endpoint(), model = client.model(), "starting chat");
    let mut app = App::new(client, endpoint);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = async {
        while !app.should_quit {
            app.poll_reply().await;
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    let conversation = app.session.conversation();
    info!(
        messages = conversation.len(),
        last_role = ?conversation.last().map(|m| m.role),
        "chat closed"
    );
    result
}
