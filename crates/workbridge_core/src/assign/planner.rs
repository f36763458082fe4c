//! Greedy streaming balancer.

use crate::assign::ledger::LoadLedger;
use crate::model::user::{SkillDomain, User, UserId};
use crate::model::work_item::WorkItem;
use std::collections::BTreeMap;

/// Outcome of one pass: every visited item plus the final working loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    /// Visited items in processing order; deferred items keep `assignee = None`.
    pub items: Vec<WorkItem>,
    pub ledger: LoadLedger,
}

/// Binds each unassigned item to the least-loaded user of its domain.
///
/// Items that already carry an assignee are passed through untouched. The
/// pass is not a global optimizer: it balances the current batch
/// left-to-right and never reshuffles earlier assignments.
pub fn plan_assignments(
    mut items: Vec<WorkItem>,
    users: &[User],
    mut ledger: LoadLedger,
) -> AssignmentPlan {
    let groups = group_by_domain(users);
    items.sort_by(|left, right| {
        left.order_key
            .cmp(&right.order_key)
            .then_with(|| left.id.cmp(&right.id))
    });

    for item in items.iter_mut().filter(|item| !item.is_assigned()) {
        let Some(candidates) = groups.get(&item.domain) else {
            continue;
        };
        let Some(chosen) = ledger.least_loaded(candidates) else {
            continue;
        };
        item.assignee = Some(chosen);
        ledger.record(chosen);
    }

    AssignmentPlan { items, ledger }
}

fn group_by_domain(users: &[User]) -> BTreeMap<SkillDomain, Vec<UserId>> {
    let mut groups: BTreeMap<SkillDomain, Vec<UserId>> = BTreeMap::new();
    for user in users {
        groups.entry(user.domain).or_default().push(user.id);
    }
    for members in groups.values_mut() {
        members.sort();
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::plan_assignments;
    use crate::assign::LoadLedger;
    use crate::model::user::{SkillDomain, User};
    use crate::model::work_item::WorkItem;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn user(n: u128, domain: SkillDomain) -> User {
        User::with_id(Uuid::from_u128(n), format!("user-{n}"), domain)
    }

    fn item(n: u128, domain: SkillDomain, order_key: i64) -> WorkItem {
        WorkItem::with_id(Uuid::from_u128(1000 + n), format!("item-{n}"), domain, order_key)
    }

    #[test]
    fn balances_equal_baseline_within_one() {
        let users = vec![
            user(1, SkillDomain::Backend),
            user(2, SkillDomain::Backend),
            user(3, SkillDomain::Backend),
        ];
        let items = (0..10).map(|n| item(n, SkillDomain::Backend, 0)).collect();
        let ledger = LoadLedger::from_counts(&users, &BTreeMap::new());

        let plan = plan_assignments(items, &users, ledger);
        let loads: Vec<u32> = users.iter().map(|u| plan.ledger.load_of(u.id)).collect();
        let max = loads.iter().max().copied().unwrap();
        let min = loads.iter().min().copied().unwrap();

        assert!(max - min <= 1, "loads {loads:?}");
        assert_eq!(loads.iter().sum::<u32>(), 10);
        assert!(plan.items.iter().all(|item| item.is_assigned()));
    }

    #[test]
    fn prefers_less_loaded_user() {
        let users = vec![user(1, SkillDomain::Backend), user(2, SkillDomain::Backend)];
        let counts = BTreeMap::from([(users[0].id, 5)]);
        let ledger = LoadLedger::from_counts(&users, &counts);

        let plan = plan_assignments(vec![item(1, SkillDomain::Backend, 0)], &users, ledger);
        assert_eq!(plan.items[0].assignee, Some(users[1].id));
    }

    #[test]
    fn only_same_domain_users_are_candidates() {
        let users = vec![user(1, SkillDomain::Frontend), user(2, SkillDomain::Ai)];
        let ledger = LoadLedger::from_counts(&users, &BTreeMap::new());

        let plan = plan_assignments(
            vec![item(1, SkillDomain::Ai, 0), item(2, SkillDomain::Frontend, 0)],
            &users,
            ledger,
        );
        for planned in &plan.items {
            let assignee = planned.assignee.unwrap();
            let owner = users.iter().find(|u| u.id == assignee).unwrap();
            assert_eq!(owner.domain, planned.domain);
        }
    }

    #[test]
    fn domain_without_users_is_deferred() {
        let users = vec![user(1, SkillDomain::Backend)];
        let ledger = LoadLedger::from_counts(&users, &BTreeMap::new());

        let plan = plan_assignments(vec![item(1, SkillDomain::Cloud, 0)], &users, ledger);
        assert_eq!(plan.items.len(), 1);
        assert!(plan.items[0].assignee.is_none());
        assert_eq!(plan.ledger.load_of(users[0].id), 0);
    }

    #[test]
    fn processing_order_follows_order_key_then_id() {
        let users = vec![user(1, SkillDomain::Backend), user(2, SkillDomain::Backend)];
        let ledger = LoadLedger::from_counts(&users, &BTreeMap::new());
        let late = item(1, SkillDomain::Backend, 9);
        let early = item(2, SkillDomain::Backend, 1);

        let plan = plan_assignments(vec![late.clone(), early.clone()], &users, ledger);
        assert_eq!(plan.items[0].id, early.id);
        assert_eq!(plan.items[0].assignee, Some(users[0].id));
        assert_eq!(plan.items[1].id, late.id);
        assert_eq!(plan.items[1].assignee, Some(users[1].id));
    }

    #[test]
    fn already_assigned_items_are_left_alone() {
        let users = vec![user(1, SkillDomain::Backend), user(2, SkillDomain::Backend)];
        let ledger = LoadLedger::from_counts(&users, &BTreeMap::new());
        let mut bound = item(1, SkillDomain::Backend, 0);
        bound.assignee = Some(users[1].id);

        let plan = plan_assignments(vec![bound], &users, ledger);
        assert_eq!(plan.items[0].assignee, Some(users[1].id));
        assert_eq!(plan.ledger.load_of(users[1].id), 0);
    }
}
