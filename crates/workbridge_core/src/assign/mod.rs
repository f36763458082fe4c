//! Fair-share assignment of work items to qualified users.
//!
//! # Responsibility
//! - Balance unassigned work items across users of the required domain.
//!
//! # Invariants
//! - Items are visited in `(order_key, id)` order.
//! - Load ties are broken by ascending user id.
//! - A domain without users leaves its items unassigned; it is not an error.

mod ledger;
mod planner;

pub use ledger::LoadLedger;
pub use planner::{plan_assignments, AssignmentPlan};
