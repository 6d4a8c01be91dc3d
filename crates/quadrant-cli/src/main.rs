//! Quadrant CLI Application
//!
//! Command-line front end for the Quadrant task manager: every subcommand
//! maps to one session operation.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use cli::Cli;
use log::info;
use quadrant_core::{ai::AiConfig, SessionBuilder};
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        user,
        ai_endpoint,
        model,
        no_color,
        command,
    } = Args::parse();

    let mut ai_config = AiConfig::default();
    if let Some(endpoint) = ai_endpoint {
        ai_config.endpoint = endpoint;
    }
    if let Some(model) = model {
        ai_config.model = model;
    }

    let session = SessionBuilder::new()
        .with_database_path(database_file)
        .with_user(user)
        .with_ai_config(ai_config)
        .build()
        .await
        .context("Failed to open session")?;

    info!("Quadrant started for '{}'", session.user());

    let cli = Cli::new(session, TerminalRenderer::new(!no_color));
    let result = cli.handle_command(command).await;
    cli.sign_out();
    result
}
