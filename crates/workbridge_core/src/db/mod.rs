//! SQLite store bootstrap.
//!
//! Connections handed out here have foreign keys enforced, a busy timeout
//! set and every known migration applied. Repositories refuse anything else.

use thiserror::Error;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    /// The file was written by a newer build.
    #[error("store schema v{db_version} is newer than this build (v{latest_supported})")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}
