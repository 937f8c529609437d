// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dukan - a conversational-commerce bot backend.
//!
//! Binary entry point: load configuration, install tracing, and run the
//! requested subcommand.

mod messaging;
mod payments;
mod serve;
mod shipping;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Dukan - conversational-commerce bot backend.
#[derive(Parser, Debug)]
#[command(name = "dukan", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot: gateway, state machine, and background sweepers.
    Serve,
    /// Load and validate configuration, then print a summary.
    Config,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match dukan_config::load_and_validate() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("dukan: {e}");
            std::process::exit(1);
        }
    };

    match Cli::parse().command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run(config).await {
                eprintln!("dukan serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!("gateway:   {}:{}", config.gateway.host, config.gateway.port);
            println!("storage:   {}", config.storage.database_path);
            println!(
                "recovery:  every {}s, window {}m..{}h",
                config.recovery.interval_secs,
                config.recovery.min_silence_minutes,
                config.recovery.max_age_hours
            );
            println!("watchdog:  every {}s", config.watchdog.interval_secs);
            println!(
                "handoff:   {}",
                if config.gateway.public_base_url.is_empty() {
                    "manual address capture (no public base url)"
                } else {
                    config.gateway.public_base_url.as_str()
                }
            );
        }
        None => {
            println!("dukan: use --help for available commands");
        }
    }
}
