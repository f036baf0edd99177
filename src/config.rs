use log::warn;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "page_redirect.toml";

/// Process-wide settings read from `page_redirect.toml`.
/// Every key is optional; a missing file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: "website/db/pages.db".to_string(),
            pool_size: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub template_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            template_dir: "website/templates".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub expiry_hours: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig { expiry_hours: 24 }
    }
}

/// First-run data. The admin account is only created when both
/// credentials are present and no user exists yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub site_name: String,
    pub site_hostname: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            site_name: "Default".to_string(),
            site_hostname: "localhost".to_string(),
            admin_email: None,
            admin_password: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        match std::fs::read_to_string(CONFIG_FILE) {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {}", CONFIG_FILE, e);
                AppConfig::default()
            }),
            Err(_) => AppConfig::default(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }
}
