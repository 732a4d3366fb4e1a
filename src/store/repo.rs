//! CRUD and query operations over the normalized jam schema.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

use super::{migrate, schema};
use crate::error::StoreError;
use crate::model::{GameType, Jam, JamDraft, Owner};

/// Search filters, combined with logical AND. `None` fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub gametype: Option<GameType>,
    /// Exact owner id, or owner name substring (case-insensitive).
    pub owner: Option<String>,
    /// Jam name substring, case-insensitive.
    pub name: Option<String>,
    /// Exact jam id.
    pub id: Option<String>,
    /// Include jams whose end already passed.
    pub include_old: bool,
}

pub struct JamStore {
    conn: Connection,
}

impl JamStore {
    /// Open (or create) the database at `path` and ensure the normalized
    /// schema exists. Cascade deletes require foreign key enforcement,
    /// which SQLite leaves off by default.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Run the one-shot legacy blob migration. See [`migrate::migrate_legacy`].
    pub fn migrate_legacy(&mut self) -> Result<usize, StoreError> {
        migrate::migrate_legacy(&mut self.conn)
    }

    /// Insert a new jam or overwrite the fields of an existing one,
    /// keyed by the site-assigned jam id. Returns the stored record.
    ///
    /// An existing row keeps its classification: the stored gametype is
    /// only replaced while it is still the unclassified default, so a
    /// re-crawl never undoes an earlier explicit or keyword
    /// classification. [`classify`](Self::classify) is the explicit path.
    pub fn upsert_jam(&mut self, draft: &JamDraft, gametype: GameType) -> Result<Jam, StoreError> {
        self.conn.execute(
            "INSERT INTO jams (jam_id, name, start_ts, duration, gametype, hashtag, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(jam_id) DO UPDATE SET
                 name        = excluded.name,
                 start_ts    = excluded.start_ts,
                 duration    = excluded.duration,
                 gametype    = CASE WHEN jams.gametype = 0
                                    THEN excluded.gametype
                                    ELSE jams.gametype END,
                 hashtag     = excluded.hashtag,
                 description = excluded.description",
            params![
                draft.id,
                draft.name,
                draft.start_ts,
                draft.duration_days,
                gametype.code(),
                draft.hashtag,
                draft.description,
            ],
        )?;

        let jam = self
            .get(std::slice::from_ref(&draft.id))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(draft.id.clone()))?;
        Ok(jam)
    }

    /// Replace the full owner set of a jam in one transaction. Owner
    /// rows themselves are upserted and kept; only the associations of
    /// this jam are replaced, so `set_owners(id, &[])` detaches all
    /// previous owners.
    pub fn set_owners(
        &mut self,
        jam_id: &str,
        owners: &[(String, String)],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        let exists: Option<i64> = tx
            .query_row("SELECT 1 FROM jams WHERE jam_id = ?1", [jam_id], |row| {
                row.get(0)
            })
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::UnknownJam(jam_id.to_string()));
        }

        tx.execute("DELETE FROM jam_owners WHERE jam_id = ?1", [jam_id])?;
        for (owner_id, owner_name) in owners {
            tx.execute(
                "INSERT INTO owners (owner_id, name) VALUES (?1, ?2)
                 ON CONFLICT(owner_id) DO UPDATE SET name = excluded.name",
                params![owner_id, owner_name],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO jam_owners (jam_id, owner_id) VALUES (?1, ?2)",
                params![jam_id, owner_id],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Set the gametype of an existing jam.
    pub fn classify(&mut self, jam_id: &str, gametype: GameType) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE jams SET gametype = ?1 WHERE jam_id = ?2",
            params![gametype.code(), jam_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(jam_id.to_string()));
        }
        Ok(())
    }

    /// Remove the given jams and their owner associations. Missing ids
    /// are no-ops so a stale id list deletes cleanly. Returns the number
    /// of jam rows actually removed.
    pub fn delete(&mut self, jam_ids: &[String]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM jams WHERE jam_id = ?1")?;
            for jam_id in jam_ids {
                removed += stmt.execute([jam_id])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Fetch the given jams with owners resolved. Ids that do not exist
    /// are omitted from the result, not errors.
    pub fn get(&self, jam_ids: &[String]) -> Result<Vec<Jam>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT jam_id, name, start_ts, duration, gametype, hashtag, description
             FROM jams WHERE jam_id = ?1",
        )?;

        let mut jams = Vec::new();
        for jam_id in jam_ids {
            if let Some(jam) = stmt.query_row([jam_id], row_to_jam).optional()? {
                jams.push(self.with_owners(jam)?);
            }
        }
        Ok(jams)
    }

    /// Search jams matching all provided filters, soonest-first
    /// (ties broken by jam id). Jams that already ended are excluded
    /// unless `include_old` is set.
    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<Jam>, StoreError> {
        let mut sql = String::from(
            "SELECT DISTINCT j.jam_id, j.name, j.start_ts, j.duration, j.gametype,
                             j.hashtag, j.description
             FROM jams j
             LEFT JOIN jam_owners jo ON jo.jam_id = j.jam_id
             LEFT JOIN owners o ON o.owner_id = jo.owner_id
             WHERE 1 = 1",
        );
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(gametype) = filter.gametype {
            sql.push_str(" AND j.gametype = ?");
            args.push(Box::new(gametype.code()));
        }
        if let Some(owner) = &filter.owner {
            sql.push_str(" AND (o.owner_id = ? OR instr(lower(o.name), lower(?)) > 0)");
            args.push(Box::new(owner.clone()));
            args.push(Box::new(owner.clone()));
        }
        if let Some(name) = &filter.name {
            sql.push_str(" AND instr(lower(j.name), lower(?)) > 0");
            args.push(Box::new(name.clone()));
        }
        if let Some(id) = &filter.id {
            sql.push_str(" AND j.jam_id = ?");
            args.push(Box::new(id.clone()));
        }
        if !filter.include_old {
            sql.push_str(" AND j.start_ts + j.duration * 86400 > ?");
            args.push(Box::new(Utc::now().timestamp()));
        }

        sql.push_str(" ORDER BY j.start_ts, j.jam_id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
                row_to_jam,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(|jam| self.with_owners(jam)).collect()
    }

    /// All stored jam ids, used by the crawler to skip known jams.
    pub fn jam_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT jam_id FROM jams")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(ids)
    }

    fn with_owners(&self, mut jam: Jam) -> Result<Jam, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT o.owner_id, o.name
             FROM owners o
             JOIN jam_owners jo ON jo.owner_id = o.owner_id
             WHERE jo.jam_id = ?1
             ORDER BY o.owner_id",
        )?;
        jam.owners = stmt
            .query_map([&jam.id], |row| {
                Ok(Owner {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jam)
    }
}

fn row_to_jam(row: &Row) -> rusqlite::Result<Jam> {
    let code: i64 = row.get(4)?;
    let gametype = GameType::from_code(code)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, code))?;
    Ok(Jam {
        id: row.get(0)?,
        name: row.get(1)?,
        start_ts: row.get(2)?,
        duration_days: row.get(3)?,
        gametype,
        hashtag: row.get(5)?,
        description: row.get(6)?,
        owners: Vec::new(),
    })
}
