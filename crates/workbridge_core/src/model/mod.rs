//! Domain model for work distribution and workspace mirroring.
//!
//! # Responsibility
//! - Define the records read and written by the assignment engine and the
//!   export orchestrator.
//! - Keep external-document references as opaque strings.
//!
//! # Invariants
//! - Every persisted record is identified by a stable `Uuid`.
//! - External references are set once and never cleared by core code.

pub mod block;
pub mod meeting;
pub mod progress;
pub mod task;
pub mod user;
pub mod work_item;
