//! # Tourney CLI Module
//!
//! This module implements the command line interface for Tourney.
//!
//! ## Available Commands
//!
//! - *(none)* - Open the terminal UI
//! - `init` - Write the default config and create the database schema
//! - `serve` - Start the HTTP server
//! - `events` - Print every event with its team and game counts

mod commands;

use crate::config::{self, Config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tourney_core::TourneyError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Tourney - tournament manager
///
/// Track events, their teams and their games from the terminal.
#[derive(Parser, Debug)]
#[command(name = "tourney")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress informational output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the database (overrides the config file)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// True when no subcommand was given and the terminal UI will run.
    pub fn is_interactive(&self) -> bool {
        self.command.is_none()
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the default config (if missing) and create the database schema
    Init {
        /// Delete an existing database before creating the schema
        #[arg(short, long)]
        force: bool,
    },

    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List events with their team and game counts
    Events {
        /// Output in JSON format (for programmatic access)
        #[arg(long)]
        json: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), TourneyError> {
    let config_path = config::resolve_config_path(cli.config.as_deref())?;
    let mut config = Config::load_or_init(&config_path)?;
    let db_path = match cli.database {
        Some(path) => path,
        None => config.database_path()?,
    };
    tracing::debug!(
        "config: {}, database: {}",
        config_path.display(),
        db_path.display()
    );

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&config_path, &db_path, force, cli.quiet),
        Some(Commands::Serve { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(&config, &db_path, cli.quiet).await
        }
        Some(Commands::Events { json }) => cmd_events(&db_path, json),
        None => cmd_tui(&db_path),
    }
}

// =============================================================================
// TESTS
// =============================================================================
