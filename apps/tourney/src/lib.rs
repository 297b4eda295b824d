//! # Tourney Library
//!
//! Everything behind the `tourney` binary, exposed as a library so the
//! HTTP layer can be exercised by integration tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod tui;
