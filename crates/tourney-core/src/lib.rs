//! # tourney-core
//!
//! The tournament data model for Tourney - THE LOGIC.
//!
//! This crate tracks events, the teams entered in them, and the games
//! between those teams. Games link to each other (previous game, game the
//! winner advances to, game the loser drops to) so an elimination bracket
//! can be represented, but nothing here advances teams through it.
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network and NO terminal dependencies (pure Rust)
//! - Every fallible operation returns `Result<T, TourneyError>`
//! - Reads and writes are single statements against SQLite

// =============================================================================
// MODULES
// =============================================================================

pub mod limits;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Event, EventId, EventStyle, EventSummary, Game, GameId, GameState, Team, TeamId,
    TourneyError,
};

// =============================================================================
// RE-EXPORTS: Storage
// =============================================================================

pub use storage::{SCHEMA_VERSION, SqliteStore};
