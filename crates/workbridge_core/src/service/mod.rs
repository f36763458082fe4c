//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and document-service calls into the
//!   operations triggered by callers.
//! - Keep trigger surfaces decoupled from storage and protocol details.

pub mod assignment_service;
pub mod export_service;
