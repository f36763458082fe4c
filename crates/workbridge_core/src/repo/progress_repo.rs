//! Persistence for description-export resume markers.

use crate::model::meeting::MeetingId;
use crate::model::progress::ExportProgress;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection};

pub trait ProgressRepository {
    fn get_progress(&self, meeting_id: MeetingId) -> RepoResult<Option<ExportProgress>>;
    /// Inserts or replaces the marker of one meeting.
    fn save_progress(&self, progress: &ExportProgress) -> RepoResult<()>;
    fn clear_progress(&self, meeting_id: MeetingId) -> RepoResult<()>;
}

pub struct SqliteProgressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProgressRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProgressRepository for SqliteProgressRepository<'_> {
    fn get_progress(&self, meeting_id: MeetingId) -> RepoResult<Option<ExportProgress>> {
        let mut stmt = self.conn.prepare(
            "SELECT fingerprint, completed_steps, total_steps
             FROM description_export_progress
             WHERE meeting_uuid = ?1;",
        )?;
        let mut rows = stmt.query([meeting_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(ExportProgress {
                meeting_id,
                fingerprint: row.get("fingerprint")?,
                completed_steps: row.get("completed_steps")?,
                total_steps: row.get("total_steps")?,
            })),
            None => Ok(None),
        }
    }

    fn save_progress(&self, progress: &ExportProgress) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO description_export_progress (
                meeting_uuid,
                fingerprint,
                completed_steps,
                total_steps
            ) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(meeting_uuid) DO UPDATE SET
                fingerprint = excluded.fingerprint,
                completed_steps = excluded.completed_steps,
                total_steps = excluded.total_steps,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                progress.meeting_id.to_string(),
                progress.fingerprint.as_str(),
                progress.completed_steps,
                progress.total_steps,
            ],
        )?;
        Ok(())
    }

    fn clear_progress(&self, meeting_id: MeetingId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM description_export_progress WHERE meeting_uuid = ?1;",
            [meeting_id.to_string()],
        )?;
        Ok(())
    }
}
