use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,   // admin, editor, author, subscriber
    pub status: String, // active, suspended, locked
    pub created_at: String,
}

impl User {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            display_name: row.get(3)?,
            role: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    const SELECT_COLS: &'static str =
        "id, email, password_hash, display_name, role, status, created_at";

    // ── Lookups ──

    pub fn get_by_id(pool: &DbPool, id: i64) -> Option<User> {
        let conn = pool.get().ok()?;
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", Self::SELECT_COLS),
            params![id],
            Self::from_row,
        )
        .ok()
    }

    pub fn get_by_email(pool: &DbPool, email: &str) -> Option<User> {
        let conn = pool.get().ok()?;
        conn.query_row(
            &format!("SELECT {} FROM users WHERE email = ?1", Self::SELECT_COLS),
            params![email],
            Self::from_row,
        )
        .ok()
    }

    pub fn count(pool: &DbPool) -> i64 {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return 0,
        };
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap_or(0)
    }

    // ── Create ──

    pub fn create(
        pool: &DbPool,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: &str,
    ) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO users (email, password_hash, display_name, role, status)
             VALUES (?1, ?2, ?3, ?4, 'active')",
            params![email, password_hash, display_name, role],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_status(pool: &DbPool, id: i64, status: &str) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "UPDATE users SET status = ?1 WHERE id = ?2",
            params![status, id],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    // ── Role helpers ──

    pub fn is_editor_or_above(&self) -> bool {
        self.role == "admin" || self.role == "editor"
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// The website designer capability: may edit pages and their redirects.
    pub fn can_edit_pages(&self) -> bool {
        self.is_active() && self.is_editor_or_above()
    }
}
