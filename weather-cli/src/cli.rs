use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_core::{Config, OpenWeatherProvider, RequestController, Submission, UiState};

use crate::view::TerminalView;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Read and write this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name; several words are joined with spaces.
        city: Vec<String>,
    },

    /// Read city names from stdin, one lookup per line.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = self.load_config()?;

        match self.command {
            Command::Configure => {
                let mut config = config;
                let api_key = inquire::Password::new("OpenWeather API key:")
                    .without_confirmation()
                    .with_display_mode(inquire::PasswordDisplayMode::Masked)
                    .prompt()
                    .context("Failed to read API key")?;
                config.set_api_key(api_key.trim().to_string());

                let path = match &self.config {
                    Some(path) => {
                        config.save_to(path)?;
                        path.clone()
                    }
                    None => config.save()?,
                };
                println!("Saved configuration to {}", path.display());
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city } => {
                let provider = OpenWeatherProvider::from_config(&config)?;
                let controller = RequestController::new(provider, TerminalView::new());

                controller.on_click(&city.join(" ")).await;

                match controller.state() {
                    UiState::Error(_) => Ok(ExitCode::FAILURE),
                    _ => Ok(ExitCode::SUCCESS),
                }
            }
            Command::Interactive => {
                let provider = OpenWeatherProvider::from_config(&config)?;
                let controller = Arc::new(RequestController::new(provider, TerminalView::new()));
                run_interactive(controller).await
            }
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

// Each line read is an "Enter" press on the input. Lookups are not awaited before the
// next line is read, so overlapping submissions race; the last one to resolve is shown.
async fn run_interactive(
    controller: Arc<RequestController<OpenWeatherProvider, TerminalView>>,
) -> anyhow::Result<ExitCode> {
    println!("Stadt eingeben und Enter drücken (Strg+D beendet).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Vec::new();

    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        pending.retain(|submission: &Submission| !submission.is_finished());
        if let Some(submission) = controller.spawn_submit(&line) {
            pending.push(submission);
        }
    }

    for submission in pending {
        submission.finished().await;
    }

    Ok(ExitCode::SUCCESS)
}
