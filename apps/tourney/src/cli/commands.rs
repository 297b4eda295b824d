//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::{api, config::Config, tui};
use std::path::Path;
use tourney_core::{EventSummary, SqliteStore, TourneyError};

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create the config (if missing) and the database schema.
///
/// The config file has already been written by the time this runs; `init`
/// reports where it lives and prepares the database.
pub fn cmd_init(
    config_path: &Path,
    db_path: &Path,
    force: bool,
    quiet: bool,
) -> Result<(), TourneyError> {
    if force && db_path.exists() {
        tracing::warn!("Removing existing database {}", db_path.display());
        std::fs::remove_file(db_path).map_err(|e| {
            TourneyError::Io(format!("Cannot remove '{}': {}", db_path.display(), e))
        })?;
    }

    let store = SqliteStore::open(db_path)?;
    let version = store.schema_version()?;
    tracing::info!(
        "Database ready at {} (schema v{})",
        db_path.display(),
        version
    );

    if !quiet {
        println!("Tourney initialized");
        println!("===================");
        println!("Config:   {}", config_path.display());
        println!("Database: {}", db_path.display());
        println!("Schema:   v{}", version);
    }

    Ok(())
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config: &Config, db_path: &Path, quiet: bool) -> Result<(), TourneyError> {
    let store = SqliteStore::open(db_path)?;
    let addr = config.server_addr();

    if !quiet {
        println!("Tourney web server starting...");
        println!();
        println!("Configuration:");
        println!("  Host:     {}", config.server.host);
        println!("  Port:     {}", config.server.port);
        println!("  Database: {}", db_path.display());
        println!();
        println!("Endpoints:");
        println!("  GET  /       - Event index page");
        println!("  GET  /health - Health check");
        println!();
        println!("Press Ctrl+C to stop");
        println!();
    }

    api::run_server(&addr, store).await
}

// =============================================================================
// EVENTS COMMAND
// =============================================================================

/// Print all events with their team and game counts.
pub fn cmd_events(db_path: &Path, json_mode: bool) -> Result<(), TourneyError> {
    let store = SqliteStore::open(db_path)?;
    let summaries = store.list_event_summaries()?;
    print!("{}", format_events(&summaries, json_mode)?);
    Ok(())
}

fn format_events(summaries: &[EventSummary], json_mode: bool) -> Result<String, TourneyError> {
    if json_mode {
        let output = serde_json::to_string_pretty(summaries)
            .map_err(|e| TourneyError::Io(format!("Cannot encode events: {}", e)))?;
        return Ok(format!("{}\n", output));
    }

    if summaries.is_empty() {
        return Ok("No events yet. Run `tourney` to create one.\n".to_string());
    }

    let mut out = format!(
        "{:>5}  {:<12}  {:<19}  {:>5}  {:>5}  NAME\n",
        "ID", "DATE", "STYLE", "TEAMS", "GAMES"
    );
    for summary in summaries {
        let event = &summary.event;
        out.push_str(&format!(
            "{:>5}  {:<12}  {:<19}  {:>5}  {:>5}  {}\n",
            event.id.map(|id| id.to_string()).unwrap_or_default(),
            event.date,
            event.style.label(),
            summary.team_count,
            summary.game_count,
            event.name
        ));
    }
    Ok(out)
}

// =============================================================================
// TUI COMMAND
// =============================================================================

/// Open the terminal UI on the given database.
pub fn cmd_tui(db_path: &Path) -> Result<(), TourneyError> {
    let store = SqliteStore::open(db_path)?;
    tracing::info!("Terminal UI opened on {}", db_path.display());
    tui::run(store)
}

// =============================================================================
// TESTS
// =============================================================================
