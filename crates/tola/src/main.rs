// SPDX-FileCopyrightText: 2026 Tola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tola - a wholesale jewelry price-enquiry service.
//!
//! This is the binary entry point for the tola server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Tola - buyers submit price enquiries, staff triage them live.
#[derive(Parser, Debug)]
#[command(name = "tola", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the enquiry gateway server.
    Serve,
    /// Load the configuration, report problems, and exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match tola_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            tola_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("tola serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!(
                "config ok: service.name={} server={}:{} storage={}",
                config.service.name,
                config.server.host,
                config.server.port,
                config.storage.database_path
            );
        }
        None => {
            println!("tola: use --help for available commands");
        }
    }
}
