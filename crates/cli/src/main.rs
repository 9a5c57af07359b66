//! Lunchline CLI - seeding and tenant management tools.
//!
//! # Usage
//!
//! ```bash
//! # Push a demo dataset into the hosted backend
//! ll-cli seed
//!
//! # Show the current tenant settings
//! ll-cli settings show
//!
//! # Rotate the guest passcode
//! ll-cli settings rotate-code
//! ```
//!
//! All commands need `BACKEND_URL` and `BACKEND_SERVICE_KEY` in the
//! environment (or a `.env` file), exactly like the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ll-cli")]
#[command(author, version, about = "Lunchline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the backend with a demo dataset
    Seed,
    /// Inspect or change tenant settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current tenant settings
    Show,
    /// Rotate the guest passcode (the old code stops working immediately)
    RotateCode,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed => commands::seed::run().await?,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show().await?,
            SettingsAction::RotateCode => commands::settings::rotate_code().await?,
        },
    }
    Ok(())
}
