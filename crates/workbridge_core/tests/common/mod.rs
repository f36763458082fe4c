#![allow(dead_code)]

use rusqlite::Connection;
use std::cell::{Cell, RefCell};
use workbridge_core::repo::meeting_repo::{
    MeetingRepository, SqliteMeetingRepository, SqliteTeamRepository, TeamRepository,
};
use workbridge_core::sync::ClientResult;
use workbridge_core::{Block, BoardRow, ClientError, DocumentClient, MeetingRecord, TeamCredential};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreatePage {
        parent_ref: String,
        title: String,
    },
    UpdateTitle {
        document_ref: String,
        title: String,
    },
    AppendBlocks {
        document_ref: String,
        blocks: Vec<Block>,
    },
    CreateContainer {
        parent_ref: String,
        title: String,
    },
    InsertRow {
        container_ref: String,
        row: BoardRow,
    },
    UpdateRow {
        row_ref: String,
        row: BoardRow,
    },
}

/// In-memory document client that records every call in order.
///
/// `failing_on(n)` makes the n-th call (1-based) answer with status 502.
#[derive(Default)]
pub struct RecordingClient {
    calls: RefCell<Vec<Call>>,
    secrets: RefCell<Vec<String>>,
    fail_on_call: Cell<Option<usize>>,
    next_id: Cell<u32>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(call_number: usize) -> Self {
        let client = Self::default();
        client.fail_on_call.set(Some(call_number));
        client
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn secrets(&self) -> Vec<String> {
        self.secrets.borrow().clone()
    }

    pub fn appended_chunk_sizes(&self) -> Vec<usize> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::AppendBlocks { blocks, .. } => Some(blocks.len()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, secret: &str, call: Call) -> ClientResult<()> {
        self.secrets.borrow_mut().push(secret.to_string());
        let mut calls = self.calls.borrow_mut();
        calls.push(call);
        if self.fail_on_call.get() == Some(calls.len()) {
            return Err(ClientError::Status {
                status: 502,
                body: "upstream unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn issue_id(&self, prefix: &str) -> String {
        let next = self.next_id.get() + 1;
        self.next_id.set(next);
        format!("{prefix}-{next}")
    }
}

impl DocumentClient for RecordingClient {
    fn create_page(&self, secret: &str, parent_ref: &str, title: &str) -> ClientResult<String> {
        self.record(
            secret,
            Call::CreatePage {
                parent_ref: parent_ref.to_string(),
                title: title.to_string(),
            },
        )?;
        Ok(self.issue_id("page"))
    }

    fn update_title(&self, secret: &str, document_ref: &str, title: &str) -> ClientResult<()> {
        self.record(
            secret,
            Call::UpdateTitle {
                document_ref: document_ref.to_string(),
                title: title.to_string(),
            },
        )
    }

    fn append_blocks(
        &self,
        secret: &str,
        document_ref: &str,
        blocks: &[Block],
    ) -> ClientResult<()> {
        self.record(
            secret,
            Call::AppendBlocks {
                document_ref: document_ref.to_string(),
                blocks: blocks.to_vec(),
            },
        )
    }

    fn create_container(
        &self,
        secret: &str,
        parent_ref: &str,
        title: &str,
    ) -> ClientResult<String> {
        self.record(
            secret,
            Call::CreateContainer {
                parent_ref: parent_ref.to_string(),
                title: title.to_string(),
            },
        )?;
        Ok(self.issue_id("board"))
    }

    fn insert_row(
        &self,
        secret: &str,
        container_ref: &str,
        row: &BoardRow,
    ) -> ClientResult<String> {
        self.record(
            secret,
            Call::InsertRow {
                container_ref: container_ref.to_string(),
                row: row.clone(),
            },
        )?;
        Ok(self.issue_id("row"))
    }

    fn update_row(&self, secret: &str, row_ref: &str, row: &BoardRow) -> ClientResult<()> {
        self.record(
            secret,
            Call::UpdateRow {
                row_ref: row_ref.to_string(),
                row: row.clone(),
            },
        )
    }
}

/// Stores a team with a secret and base location.
pub fn seed_team(conn: &Connection) -> TeamCredential {
    let mut team = TeamCredential::new("core", "secret-token");
    team.base_ref = Some("workspace-root".to_string());
    SqliteTeamRepository::try_new(conn)
        .unwrap()
        .create_team(&team)
        .unwrap();
    team
}

/// Stores a meeting with a description page for `team`.
pub fn seed_meeting(conn: &Connection, team: &TeamCredential, script: &str) -> MeetingRecord {
    let mut meeting = MeetingRecord::new(team.id, "Sprint review", script);
    meeting.description_ref = Some("page-1".to_string());
    SqliteMeetingRepository::try_new(conn)
        .unwrap()
        .create_meeting(&meeting)
        .unwrap();
    meeting
}

pub fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|n| format!("line {n}"))
        .collect::<Vec<_>>()
        .join("\n")
}
