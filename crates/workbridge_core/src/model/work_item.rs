//! Work item model.
//!
//! # Invariants
//! - `assignee`, when set, references a user whose domain equals `domain`.
//!   The repository rejects writes that break this.
//! - Only the assignment engine mutates `assignee`.

use crate::model::user::{SkillDomain, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type WorkItemId = Uuid;

/// Discrete unit of work waiting for (or bound to) one qualified user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkItemId,
    pub title: String,
    /// Domain a candidate assignee must belong to.
    pub domain: SkillDomain,
    pub assignee: Option<UserId>,
    /// Ordering key within the item's group; lower keys are assigned first.
    pub order_key: i64,
}

impl WorkItem {
    /// Creates an unassigned work item with a generated stable ID.
    pub fn new(title: impl Into<String>, domain: SkillDomain, order_key: i64) -> Self {
        Self::with_id(Uuid::new_v4(), title, domain, order_key)
    }

    pub fn with_id(
        id: WorkItemId,
        title: impl Into<String>,
        domain: SkillDomain,
        order_key: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            domain,
            assignee: None,
            order_key,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assignee.is_some()
    }
}
