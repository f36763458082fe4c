//! Working load map threaded through one assignment pass.

use crate::model::user::{User, UserId};
use std::collections::BTreeMap;

/// Current number of bound work items per user.
///
/// Starts from the store's aggregate counts and is incremented in memory as
/// the pass binds items; it is never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadLedger {
    loads: BTreeMap<UserId, u32>,
}

impl LoadLedger {
    /// Builds a ledger covering every user; users absent from `counts` start
    /// at zero.
    pub fn from_counts(users: &[User], counts: &BTreeMap<UserId, u32>) -> Self {
        let loads = users
            .iter()
            .map(|user| (user.id, counts.get(&user.id).copied().unwrap_or(0)))
            .collect();
        Self { loads }
    }

    pub fn load_of(&self, user: UserId) -> u32 {
        self.loads.get(&user).copied().unwrap_or(0)
    }

    /// Picks the candidate with the lowest load, then the lowest id.
    pub fn least_loaded(&self, candidates: &[UserId]) -> Option<UserId> {
        candidates
            .iter()
            .copied()
            .min_by_key(|candidate| (self.load_of(*candidate), *candidate))
    }

    pub fn record(&mut self, user: UserId) {
        *self.loads.entry(user).or_insert(0) += 1;
    }

    pub fn loads(&self) -> &BTreeMap<UserId, u32> {
        &self.loads
    }
}
