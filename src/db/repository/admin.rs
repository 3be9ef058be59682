//! Admin accounts and server-side bearer-token sessions.
//!
//! Only the SHA-256 hash of a session token is stored; lookups compare
//! hashes and expired rows are reaped opportunistically.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::Admin;

/// Credential row used by login; never serialized.
#[derive(Debug, Clone)]
pub struct AdminAuthRow {
    pub admin_id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Resolved session: which admin a valid token belongs to.
#[derive(Debug, Clone)]
pub struct SessionAdmin {
    pub admin_id: i64,
    pub username: String,
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn insert_admin(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO admin (username, email, password_hash) VALUES (?1, ?2, ?3)",
        params![username, email, password_hash],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<AdminAuthRow>, DatabaseError> {
    conn.query_row(
        "SELECT admin_id, username, password_hash FROM admin WHERE email = ?1",
        params![email],
        |row| {
            Ok(AdminAuthRow {
                admin_id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn get_admin(conn: &Connection, admin_id: i64) -> Result<Admin, DatabaseError> {
    conn.query_row(
        "SELECT admin_id, username, email, created_at FROM admin WHERE admin_id = ?1",
        params![admin_id],
        |row| {
            Ok(Admin {
                admin_id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "admin".into(),
            id: admin_id,
        },
        other => DatabaseError::Sqlite(other),
    })
}

pub fn create_session(
    conn: &Connection,
    admin_id: i64,
    token_hash: &str,
    expires_at: NaiveDateTime,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO admin_session (token_hash, admin_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token_hash, admin_id, expires_at.format(TIME_FORMAT).to_string()],
    )?;
    Ok(())
}

/// Resolve a token hash to its admin, if the session is still live.
/// Dead sessions are deleted on the way through.
pub fn find_session(
    conn: &Connection,
    token_hash: &str,
    now: NaiveDateTime,
) -> Result<Option<SessionAdmin>, DatabaseError> {
    purge_expired_sessions(conn, now)?;

    conn.query_row(
        "SELECT s.admin_id, a.username
         FROM admin_session s
         JOIN admin a ON a.admin_id = s.admin_id
         WHERE s.token_hash = ?1 AND s.expires_at > ?2",
        params![token_hash, now.format(TIME_FORMAT).to_string()],
        |row| {
            Ok(SessionAdmin {
                admin_id: row.get(0)?,
                username: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn purge_expired_sessions(
    conn: &Connection,
    now: NaiveDateTime,
) -> Result<usize, DatabaseError> {
    let purged = conn.execute(
        "DELETE FROM admin_session WHERE expires_at <= ?1",
        params![now.format(TIME_FORMAT).to_string()],
    )?;
    Ok(purged)
}
