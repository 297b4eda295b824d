//! # Storage Module
//!
//! Relational persistence for events, teams and games.

mod sqlite_store;

pub use sqlite_store::{SCHEMA_VERSION, SqliteStore};
