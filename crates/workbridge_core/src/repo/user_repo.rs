//! User repository contracts and SQLite implementation.
//!
//! Users are managed by an external collaborator; core code only reads them.
//! `create_user` exists for provisioning and tests.

use crate::model::user::{User, UserId};
use crate::repo::{domain_to_db, ensure_connection_ready, parse_domain, parse_uuid, RepoResult};
use rusqlite::{params, Connection, Row};

pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Returns every user ordered by ascending id.
    fn list_users(&self) -> RepoResult<Vec<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (uuid, name, domain) VALUES (?1, ?2, ?3);",
            params![user.id.to_string(), user.name.as_str(), domain_to_db(user.domain)],
        )?;
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name, domain FROM users WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name, domain FROM users ORDER BY uuid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    let domain_text: String = row.get("domain")?;
    Ok(User {
        id: parse_uuid(&uuid_text, "users.uuid")?,
        name: row.get("name")?,
        domain: parse_domain(&domain_text, "users.domain")?,
    })
}
