use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

use crate::config::{DatabaseConfig, SeedConfig};

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn init_pool(cfg: &DatabaseConfig) -> Result<DbPool, String> {
    init_pool_at(&cfg.path, cfg.pool_size)
}

pub fn init_pool_at(path: &str, max_size: u32) -> Result<DbPool, String> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }

    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder()
        .max_size(max_size.max(1))
        .build(manager)
        .map_err(|e| e.to_string())?;

    // Enable WAL mode for better concurrent read performance
    let conn = pool.get().map_err(|e| e.to_string())?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .map_err(|e| e.to_string())?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Sites (a page may belong to one site or be shared by all)
        CREATE TABLE IF NOT EXISTS sites (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            hostname TEXT UNIQUE NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Pages, with their redirect configuration.
        -- redirect_js_code is derived on read and never stored.
        CREATE TABLE IF NOT EXISTS pages (
            id INTEGER PRIMARY KEY,
            site_id INTEGER,
            name TEXT NOT NULL,
            url TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            is_published INTEGER NOT NULL DEFAULT 0,
            is_redirect INTEGER NOT NULL DEFAULT 0,
            redirect_method TEXT NOT NULL DEFAULT 'http',
            redirect_url TEXT,
            redirect_http_code TEXT DEFAULT '301',
            redirect_delay INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(site_id, url),
            FOREIGN KEY (site_id) REFERENCES sites(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);

        -- Users
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            display_name TEXT NOT NULL DEFAULT '',
            role TEXT NOT NULL DEFAULT 'subscriber',
            status TEXT NOT NULL DEFAULT 'active',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        -- Login sessions
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            created_at DATETIME NOT NULL,
            expires_at DATETIME NOT NULL,
            ip_hash TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool, seed: &SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    // Seed default site if none exists
    let site_count: i64 = conn.query_row("SELECT COUNT(*) FROM sites", [], |row| row.get(0))?;
    if site_count == 0 {
        conn.execute(
            "INSERT INTO sites (name, hostname) VALUES (?1, ?2)",
            params![seed.site_name, seed.site_hostname],
        )?;
    }

    // Seed admin account only on a fresh install with configured credentials
    let user_count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if let (0, Some(email), Some(password)) = (
        user_count,
        seed.admin_email.as_deref(),
        seed.admin_password.as_deref(),
    ) {
        let hash = crate::security::auth::hash_password(password)?;
        conn.execute(
            "INSERT INTO users (email, password_hash, display_name, role, status)
             VALUES (?1, ?2, 'Admin', 'admin', 'active')",
            params![email, hash],
        )?;
    }

    Ok(())
}
