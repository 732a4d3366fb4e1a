//! Normalized schema for jams, owners, and their association.
//!
//! `jam_owners` carries the many-to-many relationship with cascade
//! deletes declared in both directions, so removing a jam (or an owner)
//! can never leave orphaned association rows.

use rusqlite::{params, Connection};

use crate::error::StoreError;
use crate::model::GameType;

const CREATE_SQL: &str = "
CREATE TABLE IF NOT EXISTS game_types (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS jams (
    jam_id      TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    start_ts    INTEGER NOT NULL,
    duration    INTEGER NOT NULL,
    gametype    INTEGER NOT NULL DEFAULT 0 REFERENCES game_types(id),
    hashtag     TEXT,
    description TEXT
);

CREATE TABLE IF NOT EXISTS owners (
    owner_id TEXT PRIMARY KEY,
    name     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS jam_owners (
    jam_id   TEXT NOT NULL REFERENCES jams(jam_id) ON DELETE CASCADE,
    owner_id TEXT NOT NULL REFERENCES owners(owner_id) ON DELETE CASCADE,
    PRIMARY KEY (jam_id, owner_id)
);

CREATE INDEX IF NOT EXISTS idx_jams_gametype ON jams(gametype);
CREATE INDEX IF NOT EXISTS idx_jam_owners_owner_id ON jam_owners(owner_id);
";

/// Create the normalized tables and seed the fixed game type rows.
/// Safe to call against an already-initialized database.
pub fn initialize(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(CREATE_SQL)?;

    let mut stmt = conn.prepare("INSERT OR IGNORE INTO game_types (id, name) VALUES (?1, ?2)")?;
    for gt in GameType::ALL {
        stmt.execute(params![gt.code(), gt.name()])?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        initialize(&conn).unwrap();

        let seeded: i64 = conn
            .query_row("SELECT COUNT(*) FROM game_types", [], |row| row.get(0))
            .unwrap();
        assert_eq!(seeded, 3);

        let tabletop: String = conn
            .query_row("SELECT name FROM game_types WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(tabletop, "tabletop");
    }
}
