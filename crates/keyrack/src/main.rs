// SPDX-FileCopyrightText: 2026 Keyrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyrack - a personal credential vault.
//!
//! This is the binary entry point for the Keyrack server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use keyrack_config::KeyrackConfig;

mod serve;

/// Keyrack - a personal credential vault.
#[derive(Parser, Debug)]
#[command(name = "keyrack", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Keyrack server.
    Serve {
        /// Path to an explicit config file (skips the XDG hierarchy).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { config }) => {
            let config = load_config(config.as_deref());
            if let Err(e) = serve::run(config).await {
                eprintln!("keyrack: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("keyrack: use --help for available commands");
        }
    }
}

/// Load and validate configuration, rendering diagnostics and exiting on
/// failure.
fn load_config(path: Option<&Path>) -> KeyrackConfig {
    let result = match path {
        Some(path) => keyrack_config::loader::load_config_from_path(path)
            .map_err(keyrack_config::diagnostic::figment_to_config_errors)
            .and_then(|config| {
                keyrack_config::validation::validate_config(&config).map(|()| config)
            }),
        None => keyrack_config::load_and_validate(),
    };

    match result {
        Ok(config) => config,
        Err(errors) => {
            keyrack_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}
