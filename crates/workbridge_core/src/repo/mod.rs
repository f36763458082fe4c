//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the store
//!   collaborator.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories only accept connections whose schema is fully migrated.
//! - Read paths reject invalid persisted enum text instead of masking it.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::task::TaskStatus;
use crate::model::user::SkillDomain;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

pub mod meeting_repo;
pub mod progress_repo;
pub mod task_row_repo;
pub mod user_repo;
pub mod work_item_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("connection schema version {found} does not match expected {expected}")]
    SchemaNotReady { found: u32, expected: u32 },
    #[error("user {user} cannot be assigned work item {item}: domain mismatch")]
    DomainMismatch { item: Uuid, user: Uuid },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let found = current_user_version(conn)?;
    let expected = latest_version();
    if found != expected {
        return Err(RepoError::SchemaNotReady { found, expected });
    }
    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_optional_uuid(value: Option<String>, column: &str) -> RepoResult<Option<Uuid>> {
    value.map(|text| parse_uuid(&text, column)).transpose()
}

pub(crate) fn domain_to_db(domain: SkillDomain) -> &'static str {
    match domain {
        SkillDomain::Backend => "be",
        SkillDomain::Frontend => "fe",
        SkillDomain::Cloud => "cl",
        SkillDomain::Ai => "ai",
    }
}

pub(crate) fn parse_domain(value: &str, column: &str) -> RepoResult<SkillDomain> {
    match value {
        "be" => Ok(SkillDomain::Backend),
        "fe" => Ok(SkillDomain::Frontend),
        "cl" => Ok(SkillDomain::Cloud),
        "ai" => Ok(SkillDomain::Ai),
        other => Err(RepoError::InvalidData(format!(
            "invalid skill domain `{other}` in {column}"
        ))),
    }
}

pub(crate) fn status_to_db(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Done => "done",
    }
}

pub(crate) fn parse_status(value: &str, column: &str) -> RepoResult<TaskStatus> {
    match value {
        "pending" => Ok(TaskStatus::Pending),
        "in_progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        other => Err(RepoError::InvalidData(format!(
            "invalid task status `{other}` in {column}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{domain_to_db, parse_domain, parse_status, status_to_db, RepoError};
    use crate::model::task::TaskStatus;
    use crate::model::user::SkillDomain;

    #[test]
    fn domain_codes_are_reversible() {
        for domain in SkillDomain::ALL {
            let code = domain_to_db(domain);
            assert_eq!(parse_domain(code, "users.domain").unwrap(), domain);
        }
    }

    #[test]
    fn status_codes_are_reversible() {
        for status in TaskStatus::ALL {
            let code = status_to_db(status);
            assert_eq!(parse_status(code, "task_rows.status").unwrap(), status);
        }
    }

    #[test]
    fn unknown_codes_are_invalid_data() {
        let err = parse_domain("ops", "users.domain").unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("ops")));
    }
}
