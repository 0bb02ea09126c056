pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod controller;
pub mod event;
pub mod pipeline;
pub mod pollinations;
pub mod prompt;
pub mod scheduler;
pub mod ui;
pub mod wallpaper;

#[cfg(test)]
mod testing;

use app::App;
use clap::Parser;
use cli::{Cli, CliCommand};
use config::SettingsStore;
use event::EventHandler;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Initialize tracing (logs to stderr if RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = SettingsStore::default();

    match cli.command {
        // `--minimized` with no subcommand → headless auto-change.
        None if cli.minimized => run_minimized(store).await,
        // No subcommand or explicit `tui` → launch the interactive TUI.
        None | Some(CliCommand::Tui) => run_tui(store).await,
        Some(cmd) => cli::run_command(cmd, store).await,
    }
}

/// Launch the interactive TUI.
async fn run_tui(store: SettingsStore) -> color_eyre::Result<()> {
    let settings = store.load();
    tracing::info!(path = %store.path().display(), mode = ?settings.mode, "settings loaded");

    let events = EventHandler::new();
    let controller = cli::build_controller(settings, store, events.sender())?;

    let terminal = ratatui::init();
    let result = App::new(controller, events).run(terminal).await;
    ratatui::restore();
    result
}

/// Auto-change without a terminal until Ctrl-C.
async fn run_minimized(store: SettingsStore) -> color_eyre::Result<()> {
    let settings = store.load();
    let events = EventHandler::headless();
    let controller = cli::build_controller(settings, store, events.sender())?;
    app::run_headless(controller, events).await
}
