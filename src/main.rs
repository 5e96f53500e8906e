use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("apim-policy failed: {e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.resolve_config()?;

    match cli.selected_command() {
        Commands::Update => commands::handle_update(&config, cli.dry_run).await,
        Commands::Render { json } => {
            commands::handle_render(&config, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Uri => {
            commands::handle_uri(&config);
            Ok(ExitCode::SUCCESS)
        }
        Commands::ShowConfig => {
            commands::handle_show_config(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
