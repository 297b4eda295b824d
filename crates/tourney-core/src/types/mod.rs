//! # Core Type Definitions
//!
//! This module contains all core types for the Tourney data model:
//! - Row identifiers (`EventId`, `TeamId`, `GameId`)
//! - Stored enumerations (`EventStyle`, `GameState`)
//! - Records (`Event`, `Team`, `Game`, `EventSummary`)
//! - Error types (`TourneyError`)
//!
//! ## Bracket Representation
//!
//! A `Game` may point at the game that fed into it (`prev_game`), the game
//! its winner moves on to (`win_game`) and, in double elimination, the game
//! its loser drops into (`lose_game`). Together these links form the
//! elimination tree. Only the shape is validated here; advancing teams is
//! not part of the model.

use crate::limits::{MAX_EVENT_DATE_LENGTH, MAX_EVENT_NAME_LENGTH, MAX_PLAYER_NAME_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ROW IDENTIFIERS
// =============================================================================

/// Identifier of a stored event (its SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub i64);

/// Identifier of a stored team (its SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub i64);

/// Identifier of a stored game (its SQLite rowid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// EVENT STYLE
// =============================================================================

/// The elimination format of an event.
///
/// Stored as an integer column; the discriminants are the stored codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStyle {
    /// A team is out after one loss.
    #[default]
    SingleElimination = 0,
    /// Losers drop into a second bracket and are out after two losses.
    DoubleElimination = 1,
}

impl EventStyle {
    /// All styles, in the order they are offered to the user.
    pub const ALL: [Self; 2] = [Self::SingleElimination, Self::DoubleElimination];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleElimination => "single elimination",
            Self::DoubleElimination => "double elimination",
        }
    }

    /// Stored integer code.
    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Decode a stored integer code.
    pub fn from_code(code: i64) -> Result<Self, TourneyError> {
        Self::ALL
            .into_iter()
            .find(|style| style.code() == code)
            .ok_or_else(|| TourneyError::Corrupt(format!("unknown event style code {}", code)))
    }

    /// Position of this style within [`EventStyle::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for EventStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Progress of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Not started. This is the column default.
    #[default]
    Pending = 0,
    /// Being played.
    InProgress = 1,
    /// Finished; `winner` may be set.
    Complete = 2,
}

impl GameState {
    const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Complete];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in progress",
            Self::Complete => "complete",
        }
    }

    /// Stored integer code.
    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Decode a stored integer code.
    pub fn from_code(code: i64) -> Result<Self, TourneyError> {
        Self::ALL
            .into_iter()
            .find(|state| state.code() == code)
            .ok_or_else(|| TourneyError::Corrupt(format!("unknown game state code {}", code)))
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// EVENT
// =============================================================================

/// A tournament event.
///
/// `id` is `None` until the event has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<EventId>,
    pub name: String,
    pub style: EventStyle,
    /// Free-text date; sorted lexically, newest first.
    pub date: String,
}

impl Event {
    /// Create an unsaved event.
    #[must_use]
    pub fn new(name: impl Into<String>, style: EventStyle, date: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            style,
            date: date.into(),
        }
    }

    /// Check the event before it is written.
    pub fn validate(&self) -> Result<(), TourneyError> {
        if self.name.trim().is_empty() {
            return Err(TourneyError::InvalidEvent("name must not be empty".to_string()));
        }
        if self.name.len() > MAX_EVENT_NAME_LENGTH {
            return Err(TourneyError::InvalidEvent(format!(
                "name length {} exceeds maximum {} bytes",
                self.name.len(),
                MAX_EVENT_NAME_LENGTH
            )));
        }
        if self.date.len() > MAX_EVENT_DATE_LENGTH {
            return Err(TourneyError::InvalidEvent(format!(
                "date length {} exceeds maximum {} bytes",
                self.date.len(),
                MAX_EVENT_DATE_LENGTH
            )));
        }
        Ok(())
    }
}

// =============================================================================
// TEAM
// =============================================================================

/// A two-player team entered in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Option<TeamId>,
    pub event_id: EventId,
    pub player_one: String,
    pub player_two: String,
}

impl Team {
    /// Create an unsaved team for the given event.
    #[must_use]
    pub fn new(
        event_id: EventId,
        player_one: impl Into<String>,
        player_two: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            event_id,
            player_one: player_one.into(),
            player_two: player_two.into(),
        }
    }

    /// Check the team before it is written.
    ///
    /// Player names may be empty (a team can be entered before its roster
    /// is known).
    pub fn validate(&self) -> Result<(), TourneyError> {
        for name in [&self.player_one, &self.player_two] {
            if name.len() > MAX_PLAYER_NAME_LENGTH {
                return Err(TourneyError::InvalidTeam(format!(
                    "player name length {} exceeds maximum {} bytes",
                    name.len(),
                    MAX_PLAYER_NAME_LENGTH
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// GAME
// =============================================================================

/// A game between two team slots, linked into the bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: Option<GameId>,
    pub event_id: EventId,
    pub team_one: Option<TeamId>,
    pub team_two: Option<TeamId>,
    pub state: GameState,
    pub winner: Option<TeamId>,
    /// Game this one was fed from.
    pub prev_game: Option<GameId>,
    /// Game the winner moves on to.
    pub win_game: Option<GameId>,
    /// Game the loser drops into (double elimination only).
    pub lose_game: Option<GameId>,
}

impl Game {
    /// Create an unsaved, unlinked game with empty team slots.
    #[must_use]
    pub fn new(event_id: EventId) -> Self {
        Self {
            id: None,
            event_id,
            team_one: None,
            team_two: None,
            state: GameState::Pending,
            winner: None,
            prev_game: None,
            win_game: None,
            lose_game: None,
        }
    }

    /// Links from this game to other games, in `prev`, `win`, `lose` order.
    #[must_use]
    pub fn links(&self) -> [Option<GameId>; 3] {
        [self.prev_game, self.win_game, self.lose_game]
    }

    /// Check the game's shape before it is written.
    pub fn validate(&self) -> Result<(), TourneyError> {
        if let (Some(one), Some(two)) = (self.team_one, self.team_two)
            && one == two
        {
            return Err(TourneyError::InvalidGame(format!(
                "team {} cannot play itself",
                one
            )));
        }

        if let Some(winner) = self.winner
            && self.team_one != Some(winner)
            && self.team_two != Some(winner)
        {
            return Err(TourneyError::InvalidGame(format!(
                "winner {} is not playing in this game",
                winner
            )));
        }

        if let Some(id) = self.id
            && self.links().contains(&Some(id))
        {
            return Err(TourneyError::InvalidGame(format!(
                "game {} cannot link to itself",
                id
            )));
        }

        Ok(())
    }
}

// =============================================================================
// EVENT SUMMARY
// =============================================================================

/// An event together with how many teams and games it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event: Event,
    pub team_count: u64,
    pub game_count: u64,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Tourney system.
///
/// - No silent failures
/// - Use `Result<T, TourneyError>` for fallible operations
/// - Foreign errors are converted to strings at the boundary
#[derive(Debug, Error)]
pub enum TourneyError {
    /// The event failed validation.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// The team failed validation.
    #[error("Invalid team: {0}")]
    InvalidTeam(String),

    /// The game failed validation.
    #[error("Invalid game: {0}")]
    InvalidGame(String),

    /// The requested event does not exist.
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// The requested team does not exist.
    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    /// The requested game does not exist.
    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    /// The relational engine reported an error.
    #[error("Database error: {0}")]
    Database(String),

    /// Stored data could not be decoded.
    #[error("Corrupt data: {0}")]
    Corrupt(String),

    /// The configuration file is missing pieces or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
