//! Meeting and team repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `set_description_ref` and `set_board_ref` only fill an empty
//!   reference; an existing reference is never replaced.

use crate::model::meeting::{MeetingId, MeetingRecord, TeamCredential, TeamId};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

pub trait MeetingRepository {
    fn create_meeting(&self, meeting: &MeetingRecord) -> RepoResult<MeetingId>;
    fn get_meeting(&self, id: MeetingId) -> RepoResult<Option<MeetingRecord>>;
    /// Records the description page created for a meeting.
    fn set_description_ref(&self, id: MeetingId, description_ref: &str) -> RepoResult<()>;
    /// Records the task board container created for a meeting.
    fn set_board_ref(&self, id: MeetingId, board_ref: &str) -> RepoResult<()>;
}

pub trait TeamRepository {
    fn create_team(&self, team: &TeamCredential) -> RepoResult<TeamId>;
    fn get_team(&self, id: TeamId) -> RepoResult<Option<TeamCredential>>;
}

/// SQLite-backed meeting repository.
pub struct SqliteMeetingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMeetingRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MeetingRepository for SqliteMeetingRepository<'_> {
    fn create_meeting(&self, meeting: &MeetingRecord) -> RepoResult<MeetingId> {
        self.conn.execute(
            "INSERT INTO meetings (uuid, team_uuid, title, script, description_ref, board_ref)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                meeting.id.to_string(),
                meeting.team_id.to_string(),
                meeting.title.as_str(),
                meeting.script.as_str(),
                meeting.description_ref.as_deref(),
                meeting.board_ref.as_deref(),
            ],
        )?;
        Ok(meeting.id)
    }

    fn get_meeting(&self, id: MeetingId) -> RepoResult<Option<MeetingRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, team_uuid, title, script, description_ref, board_ref
             FROM meetings
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_meeting_row(row)?)),
            None => Ok(None),
        }
    }

    fn set_description_ref(&self, id: MeetingId, description_ref: &str) -> RepoResult<()> {
        self.fill_reference(id, RefColumn::Description, description_ref)
    }

    fn set_board_ref(&self, id: MeetingId, board_ref: &str) -> RepoResult<()> {
        self.fill_reference(id, RefColumn::Board, board_ref)
    }
}

#[derive(Clone, Copy)]
enum RefColumn {
    Description,
    Board,
}

impl RefColumn {
    fn name(self) -> &'static str {
        match self {
            Self::Description => "description_ref",
            Self::Board => "board_ref",
        }
    }
}

impl SqliteMeetingRepository<'_> {
    fn fill_reference(&self, id: MeetingId, column: RefColumn, value: &str) -> RepoResult<()> {
        let column = column.name();
        let changed = self.conn.execute(
            &format!("UPDATE meetings SET {column} = ?2 WHERE uuid = ?1 AND {column} IS NULL;"),
            params![id.to_string(), value],
        )?;
        if changed == 0 {
            return match self.get_meeting(id)? {
                Some(_) => Err(RepoError::InvalidData(format!(
                    "meeting {id} already has a {column}"
                ))),
                None => Err(RepoError::NotFound {
                    entity: "meeting",
                    id,
                }),
            };
        }
        Ok(())
    }
}

/// SQLite-backed team credential repository.
pub struct SqliteTeamRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeamRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TeamRepository for SqliteTeamRepository<'_> {
    fn create_team(&self, team: &TeamCredential) -> RepoResult<TeamId> {
        self.conn.execute(
            "INSERT INTO teams (uuid, name, secret, base_ref) VALUES (?1, ?2, ?3, ?4);",
            params![
                team.id.to_string(),
                team.name.as_str(),
                team.secret.as_str(),
                team.base_ref.as_deref(),
            ],
        )?;
        Ok(team.id)
    }

    fn get_team(&self, id: TeamId) -> RepoResult<Option<TeamCredential>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name, secret, base_ref FROM teams WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => {
                let uuid_text: String = row.get("uuid")?;
                Ok(Some(TeamCredential {
                    id: parse_uuid(&uuid_text, "teams.uuid")?,
                    name: row.get("name")?,
                    secret: row.get("secret")?,
                    base_ref: row.get("base_ref")?,
                }))
            }
            None => Ok(None),
        }
    }
}

fn parse_meeting_row(row: &Row<'_>) -> RepoResult<MeetingRecord> {
    let uuid_text: String = row.get("uuid")?;
    let team_text: String = row.get("team_uuid")?;
    Ok(MeetingRecord {
        id: parse_uuid(&uuid_text, "meetings.uuid")?,
        team_id: parse_uuid(&team_text, "meetings.team_uuid")?,
        title: row.get("title")?,
        script: row.get("script")?,
        description_ref: row.get("description_ref")?,
        board_ref: row.get("board_ref")?,
    })
}
