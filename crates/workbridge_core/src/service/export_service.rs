//! Workspace synchronization use-case service.
//!
//! # Responsibility
//! - Export a meeting's title and body to its description page in chunked,
//!   strictly sequential append calls, creating the page under the team's
//!   base location when the meeting has none.
//! - Create the meeting's task board on first use and mirror task rows into
//!   it.
//!
//! # Invariants
//! - Validation happens before the first external call of a flow.
//! - The first failed call aborts the rest of the flow; nothing is retried.
//! - A partially applied description export leaves a resume marker; the next
//!   call with unchanged content and the same target page continues after
//!   the last completed step.
//! - Page and board references are persisted right after creation.
//! - Row references are persisted right after each successful insert and
//!   never cleared.

use crate::chunk::{chunked, ZeroChunkLimit, DOCUMENT_BLOCK_LIMIT};
use crate::markdown::translate;
use crate::model::meeting::{MeetingId, MeetingRecord, TeamCredential};
use crate::model::progress::ExportProgress;
use crate::model::task::{BoardRow, TaskRow, TaskRowId};
use crate::model::user::UserId;
use crate::repo::meeting_repo::{
    MeetingRepository, SqliteMeetingRepository, SqliteTeamRepository, TeamRepository,
};
use crate::repo::progress_repo::{ProgressRepository, SqliteProgressRepository};
use crate::repo::task_row_repo::{SqliteTaskRowRepository, TaskRowRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::work_item_repo::{SqliteWorkItemRepository, WorkItemRepository};
use crate::repo::{RepoError, RepoResult};
use crate::sync::client::{ClientError, DocumentClient};
use log::{error, info, warn};
use rusqlite::Connection;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

/// External call that failed inside an export flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStep {
    CreatePage,
    UpdateTitle,
    /// 1-based chunk index out of `total`.
    AppendChunk { index: usize, total: usize },
    CreateContainer,
    InsertRow(TaskRowId),
    RefreshRow(TaskRowId),
}

impl Display for ExportStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreatePage => write!(f, "description page creation"),
            Self::UpdateTitle => write!(f, "title update"),
            Self::AppendChunk { index, total } => write!(f, "content chunk {index}/{total}"),
            Self::CreateContainer => write!(f, "board creation"),
            Self::InsertRow(id) => write!(f, "row insert for task {id}"),
            Self::RefreshRow(id) => write!(f, "row refresh for task {id}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },
    /// A required field is missing; no external call was issued.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The document service rejected a call; later steps were not attempted.
    #[error("document service failed at {step}: {source}")]
    External { step: ExportStep, source: ClientError },
    #[error(transparent)]
    Store(RepoError),
}

impl ExportError {
    /// HTTP status of the failing document-service call, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::External { source, .. } => source.status(),
            _ => None,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::External { .. } => "external_service",
            Self::Store(_) => "store",
        }
    }
}

impl From<RepoError> for ExportError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Store(other),
        }
    }
}

impl From<ZeroChunkLimit> for ExportError {
    fn from(value: ZeroChunkLimit) -> Self {
        Self::Validation(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionExportReport {
    pub meeting_id: MeetingId,
    pub page_ref: String,
    pub page_created: bool,
    pub blocks: usize,
    pub total_chunks: usize,
    /// Chunks appended by this call.
    pub chunks_sent: usize,
    /// Number of steps skipped because an earlier call completed them.
    pub resumed_from_step: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardExportReport {
    pub meeting_id: MeetingId,
    pub container_ref: String,
    pub container_created: bool,
    pub inserted: usize,
    pub refreshed: usize,
}

/// Export orchestrator over the SQLite store and a document client.
///
/// Repositories are the SQLite ones of a single connection; the document
/// client is the substitutable seam.
pub struct ExportService<'conn, C: DocumentClient> {
    meetings: SqliteMeetingRepository<'conn>,
    teams: SqliteTeamRepository<'conn>,
    task_rows: SqliteTaskRowRepository<'conn>,
    work_items: SqliteWorkItemRepository<'conn>,
    users: SqliteUserRepository<'conn>,
    progress: SqliteProgressRepository<'conn>,
    client: C,
    block_limit: usize,
}

impl<'conn, C: DocumentClient> ExportService<'conn, C> {
    pub fn try_new(conn: &'conn Connection, client: C) -> RepoResult<Self> {
        Ok(Self {
            meetings: SqliteMeetingRepository::try_new(conn)?,
            teams: SqliteTeamRepository::try_new(conn)?,
            task_rows: SqliteTaskRowRepository::try_new(conn)?,
            work_items: SqliteWorkItemRepository::try_new(conn)?,
            users: SqliteUserRepository::try_new(conn)?,
            progress: SqliteProgressRepository::try_new(conn)?,
            client,
            block_limit: DOCUMENT_BLOCK_LIMIT,
        })
    }

    /// Lowers the per-call block limit; values above the protocol limit are
    /// clamped to it.
    pub fn with_block_limit(mut self, limit: usize) -> Self {
        self.block_limit = limit.min(DOCUMENT_BLOCK_LIMIT);
        self
    }

    /// Pushes the meeting title and translated body to its description page.
    ///
    /// A failure mid-way leaves the page partially written; see module docs
    /// for resume semantics.
    pub fn export_description(
        &self,
        meeting_id: MeetingId,
    ) -> Result<DescriptionExportReport, ExportError> {
        let started_at = Instant::now();
        let result = self.run_description_export(meeting_id);
        match &result {
            Ok(report) => info!(
                "event=export_description module=export status=ok meeting_id={meeting_id} blocks={} chunks_sent={} resumed_from={} duration_ms={}",
                report.blocks,
                report.chunks_sent,
                report.resumed_from_step,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("export_description", meeting_id, started_at, err),
        }
        result
    }

    /// Creates the meeting's task board if needed and mirrors its task rows.
    pub fn export_task_board(&self, meeting_id: MeetingId) -> Result<BoardExportReport, ExportError> {
        let started_at = Instant::now();
        let result = self.run_board_export(meeting_id);
        match &result {
            Ok(report) => info!(
                "event=export_task_board module=export status=ok meeting_id={meeting_id} container_created={} inserted={} refreshed={} duration_ms={}",
                report.container_created,
                report.inserted,
                report.refreshed,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("export_task_board", meeting_id, started_at, err),
        }
        result
    }

    fn run_description_export(
        &self,
        meeting_id: MeetingId,
    ) -> Result<DescriptionExportReport, ExportError> {
        let (meeting, team) = self.load_meeting_and_team(meeting_id)?;
        if meeting.script.trim().is_empty() {
            return Err(ExportError::Validation(format!(
                "meeting {meeting_id} has no script to export"
            )));
        }
        let secret = required_secret(&team)?;
        let target = match meeting.description_ref.as_deref() {
            Some(value) => PageTarget::Existing(required_ref(Some(value)).ok_or_else(|| {
                ExportError::Validation(format!("meeting {meeting_id} has a blank description page"))
            })?),
            None => PageTarget::CreateUnder(required_ref(team.base_ref.as_deref()).ok_or_else(
                || {
                    ExportError::Validation(format!(
                        "meeting {meeting_id} has no description page and team {} has no base location",
                        team.id
                    ))
                },
            )?),
        };

        let blocks = translate(&meeting.script);
        let chunks = chunked(&blocks, self.block_limit)?;
        let total_steps = u32::try_from(chunks.len() + 1).map_err(|_| {
            ExportError::Validation(format!("meeting {meeting_id} body is too large"))
        })?;

        let (document_ref, page_created) = match target {
            PageTarget::Existing(page) => (page.to_string(), false),
            PageTarget::CreateUnder(parent) => {
                (self.create_description_page(&meeting, secret, parent)?, true)
            }
        };
        let document_ref = document_ref.as_str();
        let fingerprint = description_fingerprint(document_ref, &meeting.title, &meeting.script);

        let resume_from = match self.progress.get_progress(meeting_id)? {
            Some(marker)
                if marker.fingerprint == fingerprint
                    && marker.total_steps == total_steps
                    && !marker.is_complete() =>
            {
                marker.completed_steps
            }
            _ => 0,
        };
        if resume_from > 0 {
            info!(
                "event=export_description module=export status=resume meeting_id={meeting_id} completed_steps={resume_from} total_steps={total_steps}"
            );
        }

        let mut marker = ExportProgress {
            meeting_id,
            fingerprint,
            completed_steps: resume_from,
            total_steps,
        };
        let mut chunks_sent = 0;
        for step in resume_from..total_steps {
            if step == 0 {
                self.client
                    .update_title(secret, document_ref, &meeting.title)
                    .map_err(|source| ExportError::External {
                        step: ExportStep::UpdateTitle,
                        source,
                    })?;
            } else {
                let index = (step - 1) as usize;
                self.client
                    .append_blocks(secret, document_ref, chunks[index])
                    .map_err(|source| ExportError::External {
                        step: ExportStep::AppendChunk {
                            index: index + 1,
                            total: chunks.len(),
                        },
                        source,
                    })?;
                chunks_sent += 1;
            }
            marker.completed_steps = step + 1;
            self.progress.save_progress(&marker)?;
        }
        self.progress.clear_progress(meeting_id)?;

        Ok(DescriptionExportReport {
            meeting_id,
            page_ref: document_ref.to_string(),
            page_created,
            blocks: blocks.len(),
            total_chunks: chunks.len(),
            chunks_sent,
            resumed_from_step: resume_from,
        })
    }

    fn run_board_export(&self, meeting_id: MeetingId) -> Result<BoardExportReport, ExportError> {
        let (meeting, team) = self.load_meeting_and_team(meeting_id)?;
        let secret = required_secret(&team)?;
        let rows = self.task_rows.list_by_meeting(meeting_id)?;
        let projected = self.project_rows(&rows)?;

        let (container_ref, container_created) = match meeting.board_ref.clone() {
            Some(existing) => (existing, false),
            None => {
                let parent_ref = required_ref(team.base_ref.as_deref()).ok_or_else(|| {
                    ExportError::Validation(format!("team {} has no base location", team.id))
                })?;
                let created = self
                    .client
                    .create_container(secret, parent_ref, &board_title(&meeting))
                    .map_err(|source| ExportError::External {
                        step: ExportStep::CreateContainer,
                        source,
                    })?;
                if let Err(err) = self.meetings.set_board_ref(meeting_id, &created) {
                    error!(
                        "event=export_task_board module=export status=orphaned meeting_id={meeting_id} container_ref={created} error={err}"
                    );
                    return Err(err.into());
                }
                (created, true)
            }
        };

        let mut inserted = 0;
        let mut refreshed = 0;
        for (row, board_row) in rows.iter().zip(&projected) {
            match row.external_ref.as_deref() {
                Some(row_ref) => {
                    self.client
                        .update_row(secret, row_ref, board_row)
                        .map_err(|source| ExportError::External {
                            step: ExportStep::RefreshRow(row.id),
                            source,
                        })?;
                    refreshed += 1;
                }
                None => {
                    let row_ref = self
                        .client
                        .insert_row(secret, &container_ref, board_row)
                        .map_err(|source| ExportError::External {
                            step: ExportStep::InsertRow(row.id),
                            source,
                        })?;
                    self.task_rows.set_external_ref(row.id, &row_ref)?;
                    inserted += 1;
                }
            }
        }

        Ok(BoardExportReport {
            meeting_id,
            container_ref,
            container_created,
            inserted,
            refreshed,
        })
    }

    /// Creates the meeting's description page and records its reference.
    fn create_description_page(
        &self,
        meeting: &MeetingRecord,
        secret: &str,
        parent_ref: &str,
    ) -> Result<String, ExportError> {
        let created = self
            .client
            .create_page(secret, parent_ref, &meeting.title)
            .map_err(|source| ExportError::External {
                step: ExportStep::CreatePage,
                source,
            })?;
        if let Err(err) = self.meetings.set_description_ref(meeting.id, &created) {
            error!(
                "event=export_description module=export status=orphaned meeting_id={} page_ref={created} error={err}",
                meeting.id
            );
            return Err(err.into());
        }
        info!(
            "event=export_description module=export status=page_created meeting_id={} page_ref={created}",
            meeting.id
        );
        Ok(created)
    }

    fn load_meeting_and_team(
        &self,
        meeting_id: MeetingId,
    ) -> Result<(MeetingRecord, TeamCredential), ExportError> {
        let meeting = self
            .meetings
            .get_meeting(meeting_id)?
            .ok_or(ExportError::NotFound {
                entity: "meeting",
                id: meeting_id,
            })?;
        let team = self
            .teams
            .get_team(meeting.team_id)?
            .ok_or(ExportError::NotFound {
                entity: "team",
                id: meeting.team_id,
            })?;
        Ok((meeting, team))
    }

    /// Projects rows to `{description, assignee name, status}`.
    fn project_rows(&self, rows: &[TaskRow]) -> RepoResult<Vec<BoardRow>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let names: BTreeMap<UserId, String> = self
            .users
            .list_users()?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();

        rows.iter()
            .map(|row| -> RepoResult<BoardRow> {
                let assignee = match row.work_item_id {
                    Some(item_id) => self
                        .work_items
                        .get_work_item(item_id)?
                        .and_then(|item| item.assignee)
                        .and_then(|user_id| names.get(&user_id).cloned())
                        .unwrap_or_default(),
                    None => String::new(),
                };
                Ok(BoardRow {
                    description: row.description.clone(),
                    assignee,
                    status: row.status,
                })
            })
            .collect()
    }
}

fn required_ref(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn required_secret(team: &TeamCredential) -> Result<&str, ExportError> {
    let secret = team.secret.trim();
    if secret.is_empty() {
        return Err(ExportError::Validation(format!(
            "team {} has no document-service secret",
            team.id
        )));
    }
    Ok(secret)
}

fn board_title(meeting: &MeetingRecord) -> String {
    format!("{} tasks", meeting.title.trim())
}

/// Where the description goes: a known page or a new one under a parent.
enum PageTarget<'a> {
    Existing(&'a str),
    CreateUnder(&'a str),
}

/// Digest identifying what was exported to which description page.
fn description_fingerprint(document_ref: &str, title: &str, script: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_ref.as_bytes());
    hasher.update([0u8]);
    hasher.update(title.as_bytes());
    hasher.update([0u8]);
    hasher.update(script.as_bytes());
    hex::encode(hasher.finalize())
}

fn log_failure(event: &str, meeting_id: MeetingId, started_at: Instant, err: &ExportError) {
    let duration_ms = started_at.elapsed().as_millis();
    match err {
        ExportError::External { step, .. } => error!(
            "event={event} module=export status=error meeting_id={meeting_id} error_code={} step=\"{step}\" http_status={} duration_ms={duration_ms}",
            err.code(),
            err.status().map_or_else(|| "none".to_string(), |status| status.to_string())
        ),
        ExportError::Validation(_) | ExportError::NotFound { .. } => warn!(
            "event={event} module=export status=rejected meeting_id={meeting_id} error_code={} error={err} duration_ms={duration_ms}",
            err.code()
        ),
        ExportError::Store(_) => error!(
            "event={event} module=export status=error meeting_id={meeting_id} error_code={} error={err} duration_ms={duration_ms}",
            err.code()
        ),
    }
}
