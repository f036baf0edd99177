use crate::config::SeedConfig;
use crate::db::DbPool;
use crate::models::page::{Page, PageForm};
use crate::models::session::Session;
use crate::models::site::Site;
use crate::models::user::User;

use super::Store;

/// SQLite-backed implementation of the Store trait.
/// Wraps the r2d2 connection pool and delegates to model methods.
pub struct SqliteStore {
    pub pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Store for SqliteStore {
    // ── Lifecycle ───────────────────────────────────────────────────

    fn run_migrations(&self) -> Result<(), String> {
        crate::db::run_migrations(&self.pool).map_err(|e| e.to_string())
    }

    fn seed_defaults(&self, seed: &SeedConfig) -> Result<(), String> {
        crate::db::seed_defaults(&self.pool, seed).map_err(|e| e.to_string())
    }

    // ── Sites ───────────────────────────────────────────────────────

    fn site_find_by_id(&self, id: i64) -> Option<Site> {
        Site::find_by_id(&self.pool, id)
    }

    fn site_find_by_hostname(&self, hostname: &str) -> Option<Site> {
        Site::find_by_hostname(&self.pool, hostname)
    }

    fn site_default(&self) -> Option<Site> {
        Site::default_site(&self.pool)
    }

    fn site_list(&self) -> Vec<Site> {
        Site::list(&self.pool)
    }

    fn site_create(&self, name: &str, hostname: &str) -> Result<i64, String> {
        Site::create(&self.pool, name, hostname)
    }

    // ── Pages ───────────────────────────────────────────────────────

    fn page_find_by_id(&self, id: i64) -> Option<Page> {
        Page::find_by_id(&self.pool, id)
    }

    fn page_resolve(&self, site_id: i64, url: &str) -> Option<Page> {
        Page::resolve(&self.pool, site_id, url)
    }

    fn page_find_first_by_url(&self, url: &str) -> Result<Option<Page>, String> {
        Page::find_first_by_url(&self.pool, url)
    }

    fn page_list(&self) -> Vec<Page> {
        Page::list(&self.pool)
    }

    fn page_create(&self, form: &PageForm) -> Result<i64, String> {
        Page::create(&self.pool, form)
    }

    fn page_update(&self, id: i64, form: &PageForm) -> Result<(), String> {
        Page::update(&self.pool, id, form)
    }

    fn page_delete(&self, id: i64) -> Result<(), String> {
        Page::delete(&self.pool, id)
    }

    // ── Users ───────────────────────────────────────────────────────

    fn user_get_by_id(&self, id: i64) -> Option<User> {
        User::get_by_id(&self.pool, id)
    }

    fn user_get_by_email(&self, email: &str) -> Option<User> {
        User::get_by_email(&self.pool, email)
    }

    fn user_count(&self) -> i64 {
        User::count(&self.pool)
    }

    fn user_create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: &str,
    ) -> Result<i64, String> {
        User::create(&self.pool, email, password_hash, display_name, role)
    }

    fn user_update_status(&self, id: i64, status: &str) -> Result<(), String> {
        User::update_status(&self.pool, id, status)
    }

    // ── Sessions ────────────────────────────────────────────────────

    fn session_create(
        &self,
        user_id: i64,
        session_id: &str,
        expires_at: &str,
        ip_hash: Option<&str>,
    ) -> Result<(), String> {
        Session::create(&self.pool, user_id, session_id, expires_at, ip_hash)
    }

    fn session_get_user(&self, session_id: &str) -> Option<User> {
        Session::get_user(&self.pool, session_id)
    }

    fn session_delete(&self, session_id: &str) -> Result<(), String> {
        Session::delete(&self.pool, session_id)
    }

    fn session_cleanup_expired(&self) {
        Session::cleanup_expired(&self.pool)
    }
}
