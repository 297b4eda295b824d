//! # SQLite-backed Tournament Storage
//!
//! A disk-backed store using an embedded SQLite database (via `rusqlite`).
//!
//! Every read and write is a single statement; the only transaction is the
//! one that creates the schema. Referential cleanup is left to the engine:
//! - deleting an event cascades to its teams and games
//! - deleting a team clears it from any game slot or winner column
//! - deleting a game clears any link that pointed at it
//!
//! `PRAGMA foreign_keys` is switched on for every connection, otherwise
//! SQLite ignores the constraints above.

use crate::{
    Event, EventId, EventStyle, EventSummary, Game, GameId, GameState, Team, TeamId,
    TourneyError,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

/// Version written to `store_meta` when the schema is first created.
pub const SCHEMA_VERSION: i64 = 1;

const EVENT_COLUMNS: &str = "event_id, name, style, date";
const TEAM_COLUMNS: &str = "team_id, event_id, player_one, player_two";
const GAME_COLUMNS: &str =
    "game_id, event_id, team_one, team_two, state, winner, prev_game, win_game, lose_game";

/// Map a rusqlite error into the crate error type.
fn db_err(err: rusqlite::Error) -> TourneyError {
    TourneyError::Database(err.to_string())
}

/// True when the statement failed on a FOREIGN KEY constraint.
fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

/// A tournament store backed by SQLite.
pub struct SqliteStore {
    conn: Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.conn.path())
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create a store at the given path.
    ///
    /// Missing parent directories are created. The schema is created if it
    /// does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TourneyError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                TourneyError::Io(format!("Cannot create '{}': {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path).map_err(db_err)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self, TourneyError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, TourneyError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(db_err)?;
        initialize_schema(&mut conn)?;
        Ok(Self { conn })
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i64, TourneyError> {
        self.conn
            .query_row("SELECT version FROM store_meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .map_err(db_err)
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// All events, newest date first, then by name.
    pub fn list_events(&self) -> Result<Vec<Event>, TourneyError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM event ORDER BY date DESC, name"
            ))
            .map_err(db_err)?;
        let rows = stmt.query_map([], RawEvent::from_row).map_err(db_err)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row.map_err(db_err)?.into_event()?);
        }
        Ok(events)
    }

    /// All events with their team and game counts, in `list_events` order.
    pub fn list_event_summaries(&self) -> Result<Vec<EventSummary>, TourneyError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT e.event_id, e.name, e.style, e.date,
                        (SELECT COUNT(*) FROM team t WHERE t.event_id = e.event_id),
                        (SELECT COUNT(*) FROM game g WHERE g.event_id = e.event_id)
                 FROM event e
                 ORDER BY e.date DESC, e.name",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| {
                let raw = RawEvent::from_row(row)?;
                let teams: i64 = row.get(4)?;
                let games: i64 = row.get(5)?;
                Ok((raw, teams, games))
            })
            .map_err(db_err)?;

        let mut summaries = Vec::new();
        for row in rows {
            let (raw, teams, games) = row.map_err(db_err)?;
            summaries.push(EventSummary {
                event: raw.into_event()?,
                team_count: teams.max(0) as u64,
                game_count: games.max(0) as u64,
            });
        }
        Ok(summaries)
    }

    /// Look up a single event.
    pub fn get_event(&self, id: EventId) -> Result<Event, TourneyError> {
        self.conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM event WHERE event_id = ?1"),
                params![id.0],
                RawEvent::from_row,
            )
            .optional()
            .map_err(db_err)?
            .ok_or(TourneyError::EventNotFound(id))?
            .into_event()
    }

    /// Save the event, inserting it when it has no id yet.
    ///
    /// On insert the new id is written back into `event`.
    pub fn save_event(&self, event: &mut Event) -> Result<EventId, TourneyError> {
        event.validate()?;

        match event.id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO event (name, style, date) VALUES (?1, ?2, ?3)",
                        params![event.name, event.style.code(), event.date],
                    )
                    .map_err(db_err)?;
                let id = EventId(self.conn.last_insert_rowid());
                event.id = Some(id);
                Ok(id)
            }
            Some(id) => {
                let changed = self
                    .conn
                    .execute(
                        "UPDATE event SET name = ?1, style = ?2, date = ?3 WHERE event_id = ?4",
                        params![event.name, event.style.code(), event.date, id.0],
                    )
                    .map_err(db_err)?;
                if changed == 0 {
                    return Err(TourneyError::EventNotFound(id));
                }
                Ok(id)
            }
        }
    }

    /// Delete an event together with its teams and games.
    pub fn delete_event(&self, id: EventId) -> Result<(), TourneyError> {
        let changed = self
            .conn
            .execute("DELETE FROM event WHERE event_id = ?1", params![id.0])
            .map_err(db_err)?;
        if changed == 0 {
            return Err(TourneyError::EventNotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    // TEAMS
    // =========================================================================

    /// Teams entered in an event, in the order they were added.
    pub fn event_teams(&self, event_id: EventId) -> Result<Vec<Team>, TourneyError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {TEAM_COLUMNS} FROM team WHERE event_id = ?1 ORDER BY team_id"
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![event_id.0], team_from_row)
            .map_err(db_err)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    /// Save the team, inserting it when it has no id yet.
    ///
    /// Updates only touch the player names; a team never moves between
    /// events.
    pub fn save_team(&self, team: &mut Team) -> Result<TeamId, TourneyError> {
        team.validate()?;

        match team.id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO team (event_id, player_one, player_two) VALUES (?1, ?2, ?3)",
                        params![team.event_id.0, team.player_one, team.player_two],
                    )
                    .map_err(|e| {
                        if is_foreign_key_violation(&e) {
                            TourneyError::EventNotFound(team.event_id)
                        } else {
                            db_err(e)
                        }
                    })?;
                let id = TeamId(self.conn.last_insert_rowid());
                team.id = Some(id);
                Ok(id)
            }
            Some(id) => {
                let changed = self
                    .conn
                    .execute(
                        "UPDATE team SET player_one = ?1, player_two = ?2 WHERE team_id = ?3",
                        params![team.player_one, team.player_two, id.0],
                    )
                    .map_err(db_err)?;
                if changed == 0 {
                    return Err(TourneyError::TeamNotFound(id));
                }
                Ok(id)
            }
        }
    }

    /// Delete a team. Games it was playing in keep an empty slot.
    pub fn delete_team(&self, id: TeamId) -> Result<(), TourneyError> {
        let changed = self
            .conn
            .execute("DELETE FROM team WHERE team_id = ?1", params![id.0])
            .map_err(db_err)?;
        if changed == 0 {
            return Err(TourneyError::TeamNotFound(id));
        }
        Ok(())
    }

    // =========================================================================
    // GAMES
    // =========================================================================

    /// Games of an event, in the order they were created.
    pub fn event_games(&self, event_id: EventId) -> Result<Vec<Game>, TourneyError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {GAME_COLUMNS} FROM game WHERE event_id = ?1 ORDER BY game_id"
            ))
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![event_id.0], RawGame::from_row)
            .map_err(db_err)?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row.map_err(db_err)?.into_game()?);
        }
        Ok(games)
    }

    /// Save the game, inserting it when it has no id yet.
    ///
    /// Any reference to an event, team or game that does not exist, or a
    /// team or game that belongs to another event, is rejected as an
    /// invalid game.
    pub fn save_game(&self, game: &mut Game) -> Result<GameId, TourneyError> {
        game.validate()?;
        self.check_same_event(game)?;

        let fk_err = |e: rusqlite::Error| {
            if is_foreign_key_violation(&e) {
                TourneyError::InvalidGame("references a missing event, team or game".to_string())
            } else {
                db_err(e)
            }
        };

        match game.id {
            None => {
                self.conn
                    .execute(
                        "INSERT INTO game (event_id, team_one, team_two, state, winner,
                                           prev_game, win_game, lose_game)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        params![
                            game.event_id.0,
                            game.team_one.map(|t| t.0),
                            game.team_two.map(|t| t.0),
                            game.state.code(),
                            game.winner.map(|t| t.0),
                            game.prev_game.map(|g| g.0),
                            game.win_game.map(|g| g.0),
                            game.lose_game.map(|g| g.0),
                        ],
                    )
                    .map_err(fk_err)?;
                let id = GameId(self.conn.last_insert_rowid());
                game.id = Some(id);
                Ok(id)
            }
            Some(id) => {
                let changed = self
                    .conn
                    .execute(
                        "UPDATE game SET team_one = ?1, team_two = ?2, state = ?3, winner = ?4,
                                         prev_game = ?5, win_game = ?6, lose_game = ?7
                         WHERE game_id = ?8",
                        params![
                            game.team_one.map(|t| t.0),
                            game.team_two.map(|t| t.0),
                            game.state.code(),
                            game.winner.map(|t| t.0),
                            game.prev_game.map(|g| g.0),
                            game.win_game.map(|g| g.0),
                            game.lose_game.map(|g| g.0),
                            id.0,
                        ],
                    )
                    .map_err(fk_err)?;
                if changed == 0 {
                    return Err(TourneyError::GameNotFound(id));
                }
                Ok(id)
            }
        }
    }

    /// Teams and linked games must live in the game's own event. Missing
    /// rows are left to the foreign keys.
    fn check_same_event(&self, game: &Game) -> Result<(), TourneyError> {
        let teams = [game.team_one, game.team_two, game.winner]
            .into_iter()
            .flatten()
            .map(|id| ("team", "SELECT event_id FROM team WHERE team_id = ?1", id.0));
        let games = game
            .links()
            .into_iter()
            .flatten()
            .map(|id| ("game", "SELECT event_id FROM game WHERE game_id = ?1", id.0));

        for (kind, sql, id) in teams.chain(games) {
            let owner: Option<i64> = self
                .conn
                .query_row(sql, params![id], |row| row.get(0))
                .optional()
                .map_err(db_err)?;
            if let Some(owner) = owner
                && owner != game.event_id.0
            {
                return Err(TourneyError::InvalidGame(format!(
                    "{} {} belongs to event {}, not {}",
                    kind, id, owner, game.event_id
                )));
            }
        }
        Ok(())
    }

    /// Delete a game. Links that pointed at it are cleared.
    pub fn delete_game(&self, id: GameId) -> Result<(), TourneyError> {
        let changed = self
            .conn
            .execute("DELETE FROM game WHERE game_id = ?1", params![id.0])
            .map_err(db_err)?;
        if changed == 0 {
            return Err(TourneyError::GameNotFound(id));
        }
        Ok(())
    }
}

// =============================================================================
// SCHEMA
// =============================================================================

/// Create the tables, or validate the version of an existing schema.
fn initialize_schema(conn: &mut Connection) -> Result<(), TourneyError> {
    let tx = conn.transaction().map_err(db_err)?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(db_err)?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(db_err)?;

    match version {
        None => {
            tx.execute(
                "INSERT INTO store_meta (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(db_err)?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS event (
                    event_id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    style INTEGER NOT NULL,
                    date TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS team (
                    team_id INTEGER PRIMARY KEY,
                    event_id INTEGER NOT NULL,
                    player_one TEXT,
                    player_two TEXT,
                    FOREIGN KEY (event_id) REFERENCES event(event_id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_team_event ON team (event_id);
                CREATE TABLE IF NOT EXISTS game (
                    game_id INTEGER PRIMARY KEY,
                    event_id INTEGER NOT NULL,
                    team_one INTEGER,
                    team_two INTEGER,
                    state INTEGER NOT NULL DEFAULT 0,
                    winner INTEGER,
                    prev_game INTEGER,
                    win_game INTEGER,
                    lose_game INTEGER,
                    FOREIGN KEY (event_id) REFERENCES event(event_id) ON DELETE CASCADE,
                    FOREIGN KEY (team_one) REFERENCES team(team_id) ON DELETE SET NULL,
                    FOREIGN KEY (team_two) REFERENCES team(team_id) ON DELETE SET NULL,
                    FOREIGN KEY (winner) REFERENCES team(team_id) ON DELETE SET NULL,
                    FOREIGN KEY (prev_game) REFERENCES game(game_id) ON DELETE SET NULL,
                    FOREIGN KEY (win_game) REFERENCES game(game_id) ON DELETE SET NULL,
                    FOREIGN KEY (lose_game) REFERENCES game(game_id) ON DELETE SET NULL
                );
                CREATE INDEX IF NOT EXISTS idx_game_event ON game (event_id);",
            )
            .map_err(db_err)?;
        }
        Some(SCHEMA_VERSION) => {}
        Some(other) => {
            return Err(TourneyError::Corrupt(format!(
                "unsupported schema version {} (expected {})",
                other, SCHEMA_VERSION
            )));
        }
    }

    tx.commit().map_err(db_err)
}

// =============================================================================
// ROW DECODING
// =============================================================================

/// Event columns before the style code has been decoded.
struct RawEvent {
    id: i64,
    name: String,
    style: i64,
    date: String,
}

impl RawEvent {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            style: row.get(2)?,
            date: row.get(3)?,
        })
    }

    fn into_event(self) -> Result<Event, TourneyError> {
        Ok(Event {
            id: Some(EventId(self.id)),
            name: self.name,
            style: EventStyle::from_code(self.style)?,
            date: self.date,
        })
    }
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    let player_one: Option<String> = row.get(2)?;
    let player_two: Option<String> = row.get(3)?;
    Ok(Team {
        id: Some(TeamId(row.get(0)?)),
        event_id: EventId(row.get(1)?),
        player_one: player_one.unwrap_or_default(),
        player_two: player_two.unwrap_or_default(),
    })
}

/// Game columns before the state code has been decoded.
struct RawGame {
    game: Game,
    state: i64,
}

impl RawGame {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let team = |idx: usize| -> rusqlite::Result<Option<TeamId>> {
            Ok(row.get::<_, Option<i64>>(idx)?.map(TeamId))
        };
        let game = |idx: usize| -> rusqlite::Result<Option<GameId>> {
            Ok(row.get::<_, Option<i64>>(idx)?.map(GameId))
        };

        Ok(Self {
            game: Game {
                id: Some(GameId(row.get(0)?)),
                event_id: EventId(row.get(1)?),
                team_one: team(2)?,
                team_two: team(3)?,
                state: GameState::Pending,
                winner: team(5)?,
                prev_game: game(6)?,
                win_game: game(7)?,
                lose_game: game(8)?,
            },
            state: row.get(4)?,
        })
    }

    fn into_game(self) -> Result<Game, TourneyError> {
        Ok(Game {
            state: GameState::from_code(self.state)?,
            ..self.game
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn schema_is_versioned() {
        let store = SqliteStore::open_in_memory().expect("open");
        assert_eq!(store.schema_version().expect("version"), SCHEMA_VERSION);
    }

    #[test]
    fn reopening_keeps_schema_and_rows() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("nested").join("tourney.db");

        let id = {
            let store = SqliteStore::open(&db_path).expect("open db");
            let mut event = Event::new("Spring Classic", EventStyle::DoubleElimination, "2024-04-20");
            store.save_event(&mut event).expect("save")
        };

        let store = SqliteStore::open(&db_path).expect("reopen db");
        let event = store.get_event(id).expect("get");
        assert_eq!(event.name, "Spring Classic");
        assert_eq!(event.style, EventStyle::DoubleElimination);
    }

    #[test]
    fn unknown_schema_version_rejected() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("tourney.db");
        drop(SqliteStore::open(&db_path).expect("open db"));

        let conn = Connection::open(&db_path).expect("raw open");
        conn.execute("UPDATE store_meta SET version = 99", [])
            .expect("bump version");
        drop(conn);

        assert!(matches!(
            SqliteStore::open(&db_path),
            Err(TourneyError::Corrupt(_))
        ));
    }

    #[test]
    fn corrupt_style_code_surfaces_as_error() {
        let store = SqliteStore::open_in_memory().expect("open");
        store
            .conn
            .execute(
                "INSERT INTO event (name, style, date) VALUES ('Odd', 9, '2024-01-01')",
                [],
            )
            .expect("raw insert");

        assert!(matches!(
            store.list_events(),
            Err(TourneyError::Corrupt(_))
        ));
    }

    #[test]
    fn null_player_names_read_as_empty() {
        let store = SqliteStore::open_in_memory().expect("open");
        let mut event = Event::new("Open", EventStyle::SingleElimination, "2024-01-01");
        let event_id = store.save_event(&mut event).expect("save");
        store
            .conn
            .execute(
                "INSERT INTO team (event_id) VALUES (?1)",
                params![event_id.0],
            )
            .expect("raw insert");

        let teams = store.event_teams(event_id).expect("teams");
        assert_eq!(teams.len(), 1);
        assert!(teams[0].player_one.is_empty());
        assert!(teams[0].player_two.is_empty());
    }
}
