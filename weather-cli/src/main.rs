//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering the lookup state to the terminal

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod logging;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logging::init();
    let cmd = cli::Cli::parse();
    cmd.run().await
}
