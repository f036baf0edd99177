use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub hostname: String,
}

impl Site {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Site {
            id: row.get("id")?,
            name: row.get("name")?,
            hostname: row.get("hostname")?,
        })
    }

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT id, name, hostname FROM sites WHERE id = ?1",
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn find_by_hostname(pool: &DbPool, hostname: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT id, name, hostname FROM sites WHERE hostname = ?1 COLLATE NOCASE",
            params![hostname],
            Self::from_row,
        )
        .ok()
    }

    /// The fallback site for unknown hosts: the oldest one.
    pub fn default_site(pool: &DbPool) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT id, name, hostname FROM sites ORDER BY id ASC LIMIT 1",
            [],
            Self::from_row,
        )
        .ok()
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn.prepare("SELECT id, name, hostname FROM sites ORDER BY id ASC") {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    pub fn create(pool: &DbPool, name: &str, hostname: &str) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO sites (name, hostname) VALUES (?1, ?2)",
            params![name, hostname],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }
}
