//! Typed errors for the store layer.
//!
//! The store never swallows errors: any open transaction is rolled back
//! and one of these variants is returned to the caller, which owns the
//! user-facing messaging.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Operation required a jam that does not exist
    #[error("jam not found: {0}")]
    NotFound(String),

    /// Supplied game type is outside the fixed enumeration
    #[error("invalid game type: {0} (expected tabletop, digital, or unclassified)")]
    InvalidGameType(String),

    /// Owner association referenced a jam that does not exist
    #[error("cannot set owners of unknown jam: {0}")]
    UnknownJam(String),

    /// Legacy blob migration failed; nothing was committed
    #[error("legacy migration failed: {0}")]
    Migration(String),

    /// Underlying SQLite failure
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
