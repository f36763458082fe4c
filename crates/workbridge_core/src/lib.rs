//! Core domain logic for Workbridge.
//! Fair-share work assignment plus export of meetings to an external
//! document workspace.

pub mod assign;
pub mod chunk;
pub mod config;
pub mod db;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use assign::{plan_assignments, AssignmentPlan, LoadLedger};
pub use config::{load_config, ConfigError, WorkbridgeConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::block::{Block, HeadingLevel, TextRun};
pub use model::meeting::{MeetingId, MeetingRecord, TeamCredential, TeamId};
pub use model::task::{BoardRow, TaskRow, TaskRowId, TaskStatus};
pub use model::user::{SkillDomain, User, UserId};
pub use model::work_item::{WorkItem, WorkItemId};
pub use repo::{RepoError, RepoResult};
pub use service::assignment_service::{AssignmentReport, AssignmentService};
pub use service::export_service::{
    BoardExportReport, DescriptionExportReport, ExportError, ExportService, ExportStep,
};
pub use sync::{ClientError, DocumentClient, HttpDocumentClient};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
