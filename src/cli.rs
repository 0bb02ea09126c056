use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};
use tokio::sync::mpsc;

use crate::config::{self, Settings, SettingsStore};
use crate::context::ContextProvider;
use crate::controller::{self, Controller};
use crate::event::Event;
use crate::pipeline::{GenerationOutcome, GenerationPipeline, ImageStore};
use crate::pollinations::client::PollinationsClient;
use crate::pollinations::credentials;
use crate::prompt::{self, Mode};
use crate::wallpaper::DesktopWallpaper;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "pollipaper",
    about = "AI-generated desktop wallpapers from Pollinations"
)]
pub struct Cli {
    /// Run without the terminal UI, changing the wallpaper on the saved
    /// interval until Ctrl-C
    #[arg(long)]
    pub minimized: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// Generate one wallpaper and print where it was saved
    Generate {
        /// Prompt mode (time_based, weather_based, nature, ...); defaults to the saved mode
        #[arg(long)]
        mode: Option<Mode>,
        /// Custom prompt text; implies manual mode
        #[arg(long)]
        prompt: Option<String>,
        /// Save the image without setting it as the wallpaper
        #[arg(long)]
        no_apply: bool,
    },
    /// Print the prompt that would be used for a mode
    Prompt {
        #[arg(long)]
        mode: Option<Mode>,
    },
    /// Check that the image service is reachable
    Check,
}

// ---------------------------------------------------------------------------
// Construction (shared with main.rs)
// ---------------------------------------------------------------------------

/// Pipeline backed by the real service, the on-disk cache and the desktop.
pub fn build_pipeline(settings: &Settings) -> eyre::Result<GenerationPipeline> {
    credentials::load_env_files();
    let creds = credentials::resolve(settings);
    tracing::info!(
        authenticated = creds.is_authenticated(),
        model = %creds.model,
        "pollinations client initialized"
    );

    let client = PollinationsClient::new(creds).map_err(|e| eyre!("{e}"))?;
    Ok(GenerationPipeline::new(
        Arc::new(client),
        ImageStore::new(config::cache_dir()),
        Arc::new(DesktopWallpaper),
    ))
}

pub fn build_controller(
    settings: Settings,
    store: SettingsStore,
    sender: mpsc::UnboundedSender<Event>,
) -> eyre::Result<Controller> {
    let pipeline = build_pipeline(&settings)?;
    let context = ContextProvider::new().map_err(|e| eyre!("{e}"))?;
    Ok(Controller::new(
        settings,
        store,
        Arc::new(pipeline),
        Arc::new(context),
        sender,
    ))
}

/// Saved settings with the `--mode` / `--prompt` overrides applied.
fn effective_settings(mut settings: Settings, mode: Option<Mode>, prompt: Option<String>) -> Settings {
    if let Some(mode) = mode {
        settings.mode = mode;
    }
    if let Some(prompt) = prompt {
        settings.custom_prompt = prompt;
        settings.mode = Mode::Manual;
    }
    settings
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

pub async fn run_command(cmd: CliCommand, store: SettingsStore) -> eyre::Result<()> {
    let saved = store.load();

    match cmd {
        CliCommand::Tui => unreachable!("tui is handled in main"),

        CliCommand::Generate {
            mode,
            prompt,
            no_apply,
        } => {
            let settings = effective_settings(saved, mode, prompt);
            if settings.mode == Mode::Manual && settings.custom_prompt.trim().is_empty() {
                return Err(eyre!("manual mode needs a prompt; pass --prompt <text>"));
            }

            let pipeline = build_pipeline(&settings)?;
            let context = ContextProvider::new().map_err(|e| eyre!("{e}"))?;
            let ctx = context.gather(settings.mode, &settings.custom_prompt).await;
            let text = prompt::select(settings.mode, &ctx);
            eprintln!("Prompt: {text}");

            let request = controller::request_for(&settings, &text);
            let outcome = if no_apply {
                pipeline.generate_only(&request).await
            } else {
                pipeline.run(&request).await
            };

            match outcome {
                GenerationOutcome::Success {
                    saved_path, seed, ..
                } => {
                    tracing::info!(seed, "one-shot generation finished");
                    println!("{}", saved_path.display());
                }
                GenerationOutcome::Failure(failure) => return Err(eyre!("{failure}")),
            }
        }

        CliCommand::Prompt { mode } => {
            let settings = effective_settings(saved, mode, None);
            let context = ContextProvider::new().map_err(|e| eyre!("{e}"))?;
            let ctx = context.gather(settings.mode, &settings.custom_prompt).await;
            println!("{}", prompt::select(settings.mode, &ctx));
        }

        CliCommand::Check => {
            let pipeline = build_pipeline(&saved)?;
            if pipeline.client().test_connection().await {
                println!("Pollinations is reachable");
            } else {
                return Err(eyre!("could not reach Pollinations"));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
