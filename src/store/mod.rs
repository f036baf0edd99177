use crate::config::SeedConfig;
use crate::models::page::{Page, PageForm};
use crate::models::site::Site;
use crate::models::user::User;

pub mod sqlite;

/// Unified data-access trait. Every database operation goes through here.
/// Implementation: `SqliteStore` (wraps rusqlite/r2d2).
pub trait Store: Send + Sync {
    // ── Lifecycle ───────────────────────────────────────────────────
    fn run_migrations(&self) -> Result<(), String>;
    fn seed_defaults(&self, seed: &SeedConfig) -> Result<(), String>;

    // ── Sites ───────────────────────────────────────────────────────
    fn site_find_by_id(&self, id: i64) -> Option<Site>;
    fn site_find_by_hostname(&self, hostname: &str) -> Option<Site>;
    fn site_default(&self) -> Option<Site>;
    fn site_list(&self) -> Vec<Site>;
    fn site_create(&self, name: &str, hostname: &str) -> Result<i64, String>;

    // ── Pages ───────────────────────────────────────────────────────
    fn page_find_by_id(&self, id: i64) -> Option<Page>;
    /// Page a site serves at `url` (own page before shared page).
    fn page_resolve(&self, site_id: i64, url: &str) -> Option<Page>;
    /// First page at `url` across every site, ordered by site id.
    /// Errors are real database faults and must reach the caller.
    fn page_find_first_by_url(&self, url: &str) -> Result<Option<Page>, String>;
    fn page_list(&self) -> Vec<Page>;
    fn page_create(&self, form: &PageForm) -> Result<i64, String>;
    fn page_update(&self, id: i64, form: &PageForm) -> Result<(), String>;
    fn page_delete(&self, id: i64) -> Result<(), String>;

    // ── Users ───────────────────────────────────────────────────────
    fn user_get_by_id(&self, id: i64) -> Option<User>;
    fn user_get_by_email(&self, email: &str) -> Option<User>;
    fn user_count(&self) -> i64;
    fn user_create(
        &self,
        email: &str,
        password_hash: &str,
        display_name: &str,
        role: &str,
    ) -> Result<i64, String>;
    fn user_update_status(&self, id: i64, status: &str) -> Result<(), String>;

    // ── Sessions ────────────────────────────────────────────────────
    fn session_create(
        &self,
        user_id: i64,
        session_id: &str,
        expires_at: &str,
        ip_hash: Option<&str>,
    ) -> Result<(), String>;
    fn session_get_user(&self, session_id: &str) -> Option<User>;
    fn session_delete(&self, session_id: &str) -> Result<(), String>;
    fn session_cleanup_expired(&self);
}
