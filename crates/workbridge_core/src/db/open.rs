//! Connection setup for the work store.

use super::migrations::{apply_migrations, current_user_version};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the store file at `path` and migrates it.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    prepare("file", Connection::open(path).map_err(Into::into))
}

/// Opens a private in-memory store, used by tests and dry runs.
pub fn open_db_in_memory() -> DbResult<Connection> {
    prepare("memory", Connection::open_in_memory().map_err(Into::into))
}

fn prepare(mode: &str, opened: DbResult<Connection>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = opened.and_then(|mut conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_migrations(&mut conn)?;
        Ok(conn)
    });

    match &result {
        Ok(conn) => info!(
            "event=db_open module=db status=ok mode={mode} schema_version={} duration_ms={}",
            current_user_version(conn).unwrap_or_default(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}
