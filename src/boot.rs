use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::AppConfig;

/// Templates the page pipeline cannot render without
const CRITICAL_TEMPLATES: &[&str] = &["page.html.tera", "login.html.tera"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootReport {
    pub warnings: u32,
    pub errors: u32,
}

/// Run all boot checks. Call this before Rocket launches.
/// Aborts the process if critical files are absent.
pub fn run(config: &AppConfig) {
    info!("Boot check starting...");

    let report = check(config);

    if report.errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            report.errors, report.warnings
        );
        process::exit(1);
    }

    if report.warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            report.warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}

pub fn check(config: &AppConfig) -> BootReport {
    let mut report = BootReport::default();

    // ── 1. Database directory ──────────────────────────
    if let Some(db_dir) = Path::new(&config.database.path).parent() {
        if !db_dir.as_os_str().is_empty() && !db_dir.exists() {
            match fs::create_dir_all(db_dir) {
                Ok(_) => info!("  Created directory: {}", db_dir.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", db_dir.display(), e);
                    report.errors += 1;
                }
            }
        }
    }

    // ── 2. Critical templates ──────────────────────────
    let template_dir = Path::new(&config.server.template_dir);
    for file in CRITICAL_TEMPLATES {
        if !template_dir.join(file).exists() {
            error!("  MISSING critical template: {}/{}", config.server.template_dir, file);
            report.errors += 1;
        }
    }

    // ── 3. Config file ─────────────────────────────────
    if !Path::new(crate::config::CONFIG_FILE).exists() {
        warn!("  {} not found, using default config", crate::config::CONFIG_FILE);
        report.warnings += 1;
    }

    report
}
