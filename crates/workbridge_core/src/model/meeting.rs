//! Meeting record and team credential model.
//!
//! # Invariants
//! - `board_ref`, once set, is the target for every later row insert of the
//!   meeting.
//! - `TeamCredential::secret` never appears in `Debug` output or logs.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use uuid::Uuid;

pub type MeetingId = Uuid;
pub type TeamId = Uuid;

/// Meeting output mirrored into the external workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: MeetingId,
    pub team_id: TeamId,
    pub title: String,
    /// Markdown-ish body exported to the description page.
    pub script: String,
    /// Existing description page reference.
    pub description_ref: Option<String>,
    /// Task board container reference, created on first board export.
    pub board_ref: Option<String>,
}

impl MeetingRecord {
    pub fn new(team_id: TeamId, title: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            title: title.into(),
            script: script.into(),
            description_ref: None,
            board_ref: None,
        }
    }
}

/// Per-team credential for the document service.
#[derive(Clone, PartialEq, Eq)]
pub struct TeamCredential {
    pub id: TeamId,
    pub name: String,
    /// Opaque bearer secret.
    pub secret: String,
    /// Parent location for newly created documents and containers.
    pub base_ref: Option<String>,
}

impl TeamCredential {
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            secret: secret.into(),
            base_ref: None,
        }
    }
}

impl Debug for TeamCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamCredential")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .field("base_ref", &self.base_ref)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TeamCredential;

    #[test]
    fn debug_output_redacts_secret() {
        let team = TeamCredential::new("core", "secret_abc123");
        let rendered = format!("{team:?}");
        assert!(!rendered.contains("secret_abc123"));
        assert!(rendered.contains("<redacted>"));
    }
}
