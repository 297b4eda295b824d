//! # Tourney
//!
//! Tournament manager for events, their teams and their games.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                 apps/tourney (THE BINARY)              │
//! │                                                        │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │    CLI      │   │ Terminal UI │   │  HTTP page  │  │
//! │  │   (clap)    │   │  (ratatui)  │   │   (axum)    │  │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬──────┘  │
//! │         └─────────────────┼─────────────────┘         │
//! │                           ▼                           │
//! │                   ┌───────────────┐                   │
//! │                   │ tourney-core  │                   │
//! │                   │ (SQLite store)│                   │
//! │                   └───────────────┘                   │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Manage events and teams interactively
//! tourney
//!
//! # Create the config and database
//! tourney init
//!
//! # Serve the index page
//! tourney serve --port 8080
//!
//! # List events
//! tourney events --json
//! ```

use clap::Parser;
use std::sync::Mutex;
use tourney::{cli, config};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let interactive = cli.is_interactive();

    init_tracing(interactive);

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        // The log goes to a file while the terminal UI runs.
        if interactive {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Install the global subscriber. TOURNEY_LOG_FORMAT=json enables
/// machine-parseable output.
fn init_tracing(interactive: bool) {
    let log_format = std::env::var("TOURNEY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tourney=info,tower_http=info".into());

    let writer = if interactive {
        log_file_writer()
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(!interactive)
                        .with_writer(writer),
                )
                .init();
        }
    }
}

/// Append to the log file in the cache directory, or discard logs if it
/// cannot be opened. Writing to the terminal would corrupt the UI.
fn log_file_writer() -> BoxMakeWriter {
    let file = config::cache_dir().and_then(|dir| {
        std::fs::create_dir_all(&dir)
            .and_then(|()| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dir.join(config::LOG_FILE))
            })
            .map_err(|e| tourney_core::TourneyError::Io(e.to_string()))
    });

    match file {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    }
}
