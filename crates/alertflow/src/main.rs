// SPDX-FileCopyrightText: 2026 Alertflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Alertflow - webhook queue and alert classification service.
//!
//! This is the binary entry point.

mod commands;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Alertflow - turns inbound notification webhooks into classified alerts.
#[derive(Parser, Debug)]
#[command(name = "alertflow", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway and the periodic batch worker.
    Serve,
    /// Queue one JSON payload read from a file.
    Ingest {
        /// Path to a JSON document.
        file: PathBuf,
        /// Source tag recorded on the queue item.
        #[arg(long)]
        source: Option<String>,
    },
    /// Process one batch of pending items now.
    Process {
        /// Maximum items to process (defaults to processor.batch_size).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Reset a queue item back to pending.
    Reprocess {
        /// Queue item id.
        id: String,
    },
    /// Delete queue items by id, whatever their status.
    Clear {
        /// Queue item ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show queue counts by status.
    Stats {
        /// Restrict to one day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,
    },
    /// Verify the generative remediation backend is reachable.
    CheckAi,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => alertflow_config::load_and_validate_path(path),
        None => alertflow_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            alertflow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    serve::init_tracing(&config.service.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Ingest { file, source } => {
            commands::run_ingest(&config, &file, source.as_deref()).await
        }
        Commands::Process { limit } => commands::run_process(&config, limit).await,
        Commands::Reprocess { id } => commands::run_reprocess(&config, &id).await,
        Commands::Clear { ids } => commands::run_clear(&config, &ids).await,
        Commands::Stats { date } => commands::run_stats(&config, date.as_deref()).await,
        Commands::CheckAi => commands::run_check_ai(&config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
