//! User and skill-domain model.
//!
//! # Responsibility
//! - Define the people work items are distributed to.
//! - Define the closed skill-domain enumeration shared with work items.
//!
//! # Invariants
//! - Every user carries exactly one `SkillDomain`.
//! - Current load is derived from work items, never stored on the user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// Skill domain a user belongs to and a work item requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillDomain {
    Backend,
    Frontend,
    Cloud,
    Ai,
}

impl SkillDomain {
    pub const ALL: [SkillDomain; 4] = [
        SkillDomain::Backend,
        SkillDomain::Frontend,
        SkillDomain::Cloud,
        SkillDomain::Ai,
    ];
}

/// A person that can receive work items of their own domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Display name mirrored into the task board assignee column.
    pub name: String,
    pub domain: SkillDomain,
}

impl User {
    pub fn new(name: impl Into<String>, domain: SkillDomain) -> Self {
        Self::with_id(Uuid::new_v4(), name, domain)
    }

    pub fn with_id(id: UserId, name: impl Into<String>, domain: SkillDomain) -> Self {
        Self {
            id,
            name: name.into(),
            domain,
        }
    }
}
