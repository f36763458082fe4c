//! Task row repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Rows of one meeting are listed in insertion order.
//! - `set_external_ref` writes a reference at most once per row.

use crate::model::meeting::MeetingId;
use crate::model::task::{TaskRow, TaskRowId};
use crate::repo::{
    ensure_connection_ready, parse_optional_uuid, parse_status, parse_uuid, status_to_db,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

pub trait TaskRowRepository {
    fn create_task_row(&self, row: &TaskRow) -> RepoResult<TaskRowId>;
    fn list_by_meeting(&self, meeting_id: MeetingId) -> RepoResult<Vec<TaskRow>>;
    /// Stores the board row reference returned by a successful insert.
    fn set_external_ref(&self, id: TaskRowId, external_ref: &str) -> RepoResult<()>;
}

/// SQLite-backed task row repository.
pub struct SqliteTaskRowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRowRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRowRepository for SqliteTaskRowRepository<'_> {
    fn create_task_row(&self, row: &TaskRow) -> RepoResult<TaskRowId> {
        self.conn.execute(
            "INSERT INTO task_rows (
                uuid,
                meeting_uuid,
                description,
                work_item_uuid,
                status,
                external_ref
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                row.id.to_string(),
                row.meeting_id.to_string(),
                row.description.as_str(),
                row.work_item_id.map(|id| id.to_string()),
                status_to_db(row.status),
                row.external_ref.as_deref(),
            ],
        )?;
        Ok(row.id)
    }

    fn list_by_meeting(&self, meeting_id: MeetingId) -> RepoResult<Vec<TaskRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, meeting_uuid, description, work_item_uuid, status, external_ref
             FROM task_rows
             WHERE meeting_uuid = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([meeting_id.to_string()])?;
        let mut task_rows = Vec::new();
        while let Some(row) = rows.next()? {
            task_rows.push(parse_task_row(row)?);
        }
        Ok(task_rows)
    }

    fn set_external_ref(&self, id: TaskRowId, external_ref: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE task_rows SET external_ref = ?2 WHERE uuid = ?1 AND external_ref IS NULL;",
            params![id.to_string(), external_ref],
        )?;
        if changed == 0 {
            let exists: bool = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM task_rows WHERE uuid = ?1);",
                [id.to_string()],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(RepoError::NotFound {
                    entity: "task row",
                    id,
                });
            }
            return Err(RepoError::InvalidData(format!(
                "task row {id} already has an external reference"
            )));
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<TaskRow> {
    let uuid_text: String = row.get("uuid")?;
    let meeting_text: String = row.get("meeting_uuid")?;
    let status_text: String = row.get("status")?;
    Ok(TaskRow {
        id: parse_uuid(&uuid_text, "task_rows.uuid")?,
        meeting_id: parse_uuid(&meeting_text, "task_rows.meeting_uuid")?,
        description: row.get("description")?,
        work_item_id: parse_optional_uuid(row.get("work_item_uuid")?, "task_rows.work_item_uuid")?,
        status: parse_status(&status_text, "task_rows.status")?,
        external_ref: row.get("external_ref")?,
    })
}
