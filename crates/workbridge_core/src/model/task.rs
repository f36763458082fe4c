//! Task row model and its board projection.
//!
//! # Responsibility
//! - Define meeting task rows mirrored to the external task board.
//! - Define the fixed three-state status and its board rendering.
//!
//! # Invariants
//! - `external_ref` is written once after a successful insert and never
//!   cleared.

use crate::model::meeting::MeetingId;
use crate::model::work_item::WorkItemId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TaskRowId = Uuid;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done];

    /// Option name used by the board status column.
    pub fn board_label(self) -> &'static str {
        match self {
            Self::Pending => "BEFORE",
            Self::InProgress => "DOING",
            Self::Done => "DONE",
        }
    }

    /// Option color used by the board status column.
    pub fn board_color(self) -> &'static str {
        match self {
            Self::Pending => "default",
            Self::InProgress => "blue",
            Self::Done => "green",
        }
    }
}

/// One actionable row produced from a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: TaskRowId,
    pub meeting_id: MeetingId,
    pub description: String,
    /// Work item carrying this row's domain and assignee classification.
    pub work_item_id: Option<WorkItemId>,
    pub status: TaskStatus,
    /// Board row reference, set after the first successful export.
    pub external_ref: Option<String>,
}

impl TaskRow {
    pub fn new(meeting_id: MeetingId, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            meeting_id,
            description: description.into(),
            work_item_id: None,
            status: TaskStatus::Pending,
            external_ref: None,
        }
    }
}

/// Minimal shape sent to the board for one task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub description: String,
    /// Assignee display name; empty when the row has no assignee.
    pub assignee: String,
    pub status: TaskStatus,
}
