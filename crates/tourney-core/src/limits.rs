//! # Input Limits
//!
//! Fixed bounds applied to user-supplied text before it reaches the store.
//!
//! The store itself accepts any length; these limits keep the terminal
//! layout and the web index readable and reject accidental pastes.

/// Maximum length of an event name, in bytes.
pub const MAX_EVENT_NAME_LENGTH: usize = 128;

/// Maximum length of an event date, in bytes.
///
/// Dates are free text ("2024-06-01", "June 1st", ...), so only the length
/// is bounded.
pub const MAX_EVENT_DATE_LENGTH: usize = 32;

/// Maximum length of a single player name, in bytes.
pub const MAX_PLAYER_NAME_LENGTH: usize = 64;
