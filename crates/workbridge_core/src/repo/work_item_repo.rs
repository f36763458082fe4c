//! Work item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Serve the three reads the assignment engine needs: unassigned items,
//!   and per-user load as one aggregate query.
//! - Persist a whole assignment batch atomically.
//!
//! # Invariants
//! - `save_assignments` writes every item or none.
//! - An assignee is only written when its domain matches the item's domain.

use crate::model::user::UserId;
use crate::model::work_item::{WorkItem, WorkItemId};
use crate::repo::{
    domain_to_db, ensure_connection_ready, parse_domain, parse_optional_uuid, parse_uuid,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;

const WORK_ITEM_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    domain,
    assignee_uuid,
    order_key
FROM work_items";

pub trait WorkItemRepository {
    fn create_work_item(&self, item: &WorkItem) -> RepoResult<WorkItemId>;
    fn get_work_item(&self, id: WorkItemId) -> RepoResult<Option<WorkItem>>;
    /// Returns items with no assignee in store order.
    fn list_unassigned(&self) -> RepoResult<Vec<WorkItem>>;
    /// Count of currently bound items per assignee; users with no items are
    /// absent from the map.
    fn assignment_counts(&self) -> RepoResult<BTreeMap<UserId, u32>>;
    /// Writes the assignee of every item in one transaction.
    fn save_assignments(&self, items: &[WorkItem]) -> RepoResult<()>;
}

/// SQLite-backed work item repository.
pub struct SqliteWorkItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkItemRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl WorkItemRepository for SqliteWorkItemRepository<'_> {
    fn create_work_item(&self, item: &WorkItem) -> RepoResult<WorkItemId> {
        if let Some(assignee) = item.assignee {
            ensure_domain_matches(self.conn, item, assignee)?;
        }

        self.conn.execute(
            "INSERT INTO work_items (uuid, title, domain, assignee_uuid, order_key)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                item.id.to_string(),
                item.title.as_str(),
                domain_to_db(item.domain),
                item.assignee.map(|id| id.to_string()),
                item.order_key,
            ],
        )?;
        Ok(item.id)
    }

    fn get_work_item(&self, id: WorkItemId) -> RepoResult<Option<WorkItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORK_ITEM_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_work_item_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_unassigned(&self) -> RepoResult<Vec<WorkItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WORK_ITEM_SELECT_SQL} WHERE assignee_uuid IS NULL;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_work_item_row(row)?);
        }
        Ok(items)
    }

    fn assignment_counts(&self) -> RepoResult<BTreeMap<UserId, u32>> {
        let mut stmt = self.conn.prepare(
            "SELECT assignee_uuid, COUNT(*) AS assigned
             FROM work_items
             WHERE assignee_uuid IS NOT NULL
             GROUP BY assignee_uuid;",
        )?;
        let mut rows = stmt.query([])?;
        let mut counts = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("assignee_uuid")?;
            let assigned: u32 = row.get("assigned")?;
            counts.insert(parse_uuid(&uuid_text, "work_items.assignee_uuid")?, assigned);
        }
        Ok(counts)
    }

    fn save_assignments(&self, items: &[WorkItem]) -> RepoResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        let tx = self.conn.unchecked_transaction()?;
        for item in items {
            if let Some(assignee) = item.assignee {
                ensure_domain_matches(&tx, item, assignee)?;
            }

            let changed = tx.execute(
                "UPDATE work_items
                 SET
                    assignee_uuid = ?1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?2;",
                params![item.assignee.map(|id| id.to_string()), item.id.to_string()],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "work item",
                    id: item.id,
                });
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn ensure_domain_matches(conn: &Connection, item: &WorkItem, assignee: UserId) -> RepoResult<()> {
    let domain_text: Option<String> = conn
        .query_row(
            "SELECT domain FROM users WHERE uuid = ?1;",
            [assignee.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    let Some(domain_text) = domain_text else {
        return Err(RepoError::NotFound {
            entity: "user",
            id: assignee,
        });
    };

    if parse_domain(&domain_text, "users.domain")? != item.domain {
        return Err(RepoError::DomainMismatch {
            item: item.id,
            user: assignee,
        });
    }
    Ok(())
}

fn parse_work_item_row(row: &Row<'_>) -> RepoResult<WorkItem> {
    let uuid_text: String = row.get("uuid")?;
    let domain_text: String = row.get("domain")?;
    Ok(WorkItem {
        id: parse_uuid(&uuid_text, "work_items.uuid")?,
        title: row.get("title")?,
        domain: parse_domain(&domain_text, "work_items.domain")?,
        assignee: parse_optional_uuid(row.get("assignee_uuid")?, "work_items.assignee_uuid")?,
        order_key: row.get("order_key")?,
    })
}
