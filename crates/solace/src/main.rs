// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Solace - a mode-based supportive chat service.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod serve;
mod shutdown;
mod token;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use solace_config::SolaceConfig;

/// Solace - a mode-based supportive chat service.
#[derive(Parser, Debug)]
#[command(name = "solace", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP chat server.
    Serve,
    /// Check configuration, database and credentials.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Mint a bearer token for local development.
    Token {
        /// User id placed in the `sub` claim.
        #[arg(long)]
        user: String,
        /// Lifetime of the token in seconds.
        #[arg(long, default_value_t = 3600)]
        ttl_secs: u64,
        /// Optional `email` claim.
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            solace_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Doctor { plain }) => match doctor::run_doctor(&config, plain).await {
            Ok(0) => Ok(()),
            Ok(_) => std::process::exit(1),
            Err(e) => Err(e),
        },
        Some(Commands::Token {
            user,
            ttl_secs,
            email,
        }) => token::run_token(&config, &user, ttl_secs, email).map(|t| println!("{t}")),
        None => {
            println!("solace: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<SolaceConfig, Vec<solace_config::ConfigError>> {
    match path {
        Some(path) => solace_config::load_and_validate_path(path),
        None => solace_config::load_and_validate(),
    }
}
