//! Assignment use-case service.
//!
//! # Responsibility
//! - Run one fair-share pass over every unassigned work item.
//! - Persist newly bound items in a single batch write.
//!
//! # Invariants
//! - No unassigned items means no further reads and no writes.
//! - Callers serialize invocations; the service holds no lock of its own.

use crate::assign::{plan_assignments, LoadLedger};
use crate::model::work_item::WorkItem;
use crate::repo::user_repo::UserRepository;
use crate::repo::work_item_repo::WorkItemRepository;
use crate::repo::RepoResult;
use log::{error, info};
use serde::Serialize;
use std::time::Instant;

/// Items visited by one `assign_pending` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentReport {
    /// Every item that was unassigned at the start of the pass, in
    /// processing order; deferred ones still have no assignee.
    pub touched: Vec<WorkItem>,
}

impl AssignmentReport {
    pub fn assigned(&self) -> impl Iterator<Item = &WorkItem> {
        self.touched.iter().filter(|item| item.is_assigned())
    }

    /// Items left unassigned because their domain had no users.
    pub fn deferred(&self) -> impl Iterator<Item = &WorkItem> {
        self.touched.iter().filter(|item| !item.is_assigned())
    }
}

pub struct AssignmentService<W: WorkItemRepository, U: UserRepository> {
    work_items: W,
    users: U,
}

impl<W: WorkItemRepository, U: UserRepository> AssignmentService<W, U> {
    pub fn new(work_items: W, users: U) -> Self {
        Self { work_items, users }
    }

    /// Assigns every currently unassigned work item it can.
    ///
    /// # Errors
    /// Only store failures; a domain without users is a silent skip.
    pub fn assign_pending(&self) -> RepoResult<AssignmentReport> {
        let started_at = Instant::now();
        match self.run_pass() {
            Ok(report) => {
                info!(
                    "event=assign_pending module=assign status=ok touched={} assigned={} deferred={} duration_ms={}",
                    report.touched.len(),
                    report.assigned().count(),
                    report.deferred().count(),
                    started_at.elapsed().as_millis()
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=assign_pending module=assign status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn run_pass(&self) -> RepoResult<AssignmentReport> {
        let unassigned = self.work_items.list_unassigned()?;
        if unassigned.is_empty() {
            return Ok(AssignmentReport::default());
        }

        let users = self.users.list_users()?;
        let counts = self.work_items.assignment_counts()?;
        let ledger = LoadLedger::from_counts(&users, &counts);
        let plan = plan_assignments(unassigned, &users, ledger);

        let newly_bound: Vec<WorkItem> = plan
            .items
            .iter()
            .filter(|item| item.is_assigned())
            .cloned()
            .collect();
        if !newly_bound.is_empty() {
            self.work_items.save_assignments(&newly_bound)?;
        }

        Ok(AssignmentReport {
            touched: plan.items,
        })
    }
}
