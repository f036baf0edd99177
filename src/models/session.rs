use rusqlite::params;

use crate::db::DbPool;
use crate::models::user::User;

pub struct Session;

impl Session {
    pub fn create(
        pool: &DbPool,
        user_id: i64,
        session_id: &str,
        expires_at: &str,
        ip_hash: Option<&str>,
    ) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO sessions (id, user_id, created_at, expires_at, ip_hash)
             VALUES (?1, ?2, datetime('now'), ?3, ?4)",
            params![session_id, user_id, expires_at, ip_hash],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }

    /// User behind an unexpired session.
    pub fn get_user(pool: &DbPool, session_id: &str) -> Option<User> {
        let user_id: i64 = {
            let conn = pool.get().ok()?;
            conn.query_row(
                "SELECT user_id FROM sessions WHERE id = ?1 AND expires_at > datetime('now')",
                params![session_id],
                |row| row.get(0),
            )
            .ok()?
        };
        User::get_by_id(pool, user_id)
    }

    pub fn delete(pool: &DbPool, session_id: &str) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn cleanup_expired(pool: &DbPool) {
        if let Ok(conn) = pool.get() {
            let _ = conn.execute("DELETE FROM sessions WHERE expires_at <= datetime('now')", []);
        }
    }
}
