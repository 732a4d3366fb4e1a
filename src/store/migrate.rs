//! One-shot migration from the legacy blob table to the normalized schema.
//!
//! Earlier versions of this tool stored each jam as a single JSON blob in
//! `itch_jams(jam_id, jam_data)`. The migration decodes every blob and
//! rewrites it as normalized `jams` + `owners` + `jam_owners` rows, then
//! drops the legacy table, all inside one transaction. A reader never
//! observes a half-migrated database: either the legacy table is gone and
//! the normalized tables hold all of its data, or the legacy table is
//! untouched and nothing was committed.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};
use serde::Deserialize;

use super::schema;
use crate::error::StoreError;
use crate::model::GameType;

const LEGACY_TABLE: &str = "itch_jams";

/// Field layout of one legacy blob, as written by the blob-era tool.
#[derive(Debug, Deserialize)]
struct LegacyJam {
    jam_name: String,
    /// The old tool stored a float timestamp.
    jam_start: f64,
    jam_duration: i64,
    #[serde(default)]
    jam_gametype: i64,
    #[serde(default)]
    jam_hashtag: Option<String>,
    #[serde(default)]
    jam_description: Option<String>,
    #[serde(default)]
    jam_owners: BTreeMap<String, String>,
}

/// The normalized schema never creates a table by the legacy name, so
/// its presence alone identifies a pre-migration database.
fn legacy_table_exists(conn: &Connection) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [LEGACY_TABLE],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Migrate a legacy blob-table database to the normalized schema.
///
/// Returns the number of jams migrated. Re-running after a completed
/// migration (or against a fresh database) is a no-op returning 0. Any
/// malformed blob aborts the whole migration with
/// [`StoreError::Migration`], leaving the legacy table authoritative so
/// the migration can be retried wholesale.
pub fn migrate_legacy(conn: &mut Connection) -> Result<usize, StoreError> {
    if !legacy_table_exists(conn)? {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    schema::initialize(&tx)?;

    let rows: Vec<(String, String)> = {
        let mut stmt = tx.prepare(&format!("SELECT jam_id, jam_data FROM {LEGACY_TABLE}"))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    let mut migrated = 0;
    for (jam_id, blob) in rows {
        let legacy: LegacyJam = serde_json::from_str(&blob)
            .map_err(|e| StoreError::Migration(format!("jam {jam_id}: malformed blob: {e}")))?;
        let gametype = GameType::from_code(legacy.jam_gametype).ok_or_else(|| {
            StoreError::Migration(format!(
                "jam {jam_id}: unknown gametype code {}",
                legacy.jam_gametype
            ))
        })?;

        tx.execute(
            "INSERT OR REPLACE INTO jams
                 (jam_id, name, start_ts, duration, gametype, hashtag, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                jam_id,
                legacy.jam_name,
                legacy.jam_start as i64,
                legacy.jam_duration,
                gametype.code(),
                legacy.jam_hashtag,
                legacy.jam_description,
            ],
        )?;

        for (owner_id, owner_name) in &legacy.jam_owners {
            tx.execute(
                "INSERT OR IGNORE INTO owners (owner_id, name) VALUES (?1, ?2)",
                params![owner_id, owner_name],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO jam_owners (jam_id, owner_id) VALUES (?1, ?2)",
                params![jam_id, owner_id],
            )?;
        }

        migrated += 1;
    }

    tx.execute(&format!("DROP TABLE {LEGACY_TABLE}"), [])?;
    tx.commit()?;

    Ok(migrated)
}
