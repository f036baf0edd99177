use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbPool;

// ── Redirect configuration enums ───────────────────────

/// How a redirect page sends visitors to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedirectMethod {
    /// Server-side 3xx response with a `Location` header.
    #[default]
    #[serde(rename = "http")]
    Http,
    /// `<meta http-equiv="refresh">` in the rendered page.
    #[serde(rename = "meta")]
    Meta,
    /// Script that assigns `window.location.href` (adds a history entry).
    #[serde(rename = "js-href")]
    JsHref,
    /// Script that calls `window.location.replace` (replaces the history entry).
    #[serde(rename = "js-replace")]
    JsReplace,
}

impl RedirectMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectMethod::Http => "http",
            RedirectMethod::Meta => "meta",
            RedirectMethod::JsHref => "js-href",
            RedirectMethod::JsReplace => "js-replace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "http" => Some(RedirectMethod::Http),
            "meta" => Some(RedirectMethod::Meta),
            "js-href" => Some(RedirectMethod::JsHref),
            "js-replace" => Some(RedirectMethod::JsReplace),
            _ => None,
        }
    }
}

/// Status codes an editor may pick for HTTP redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedirectHttpCode {
    #[default]
    #[serde(rename = "301")]
    MovedPermanently,
    #[serde(rename = "302")]
    Found,
    #[serde(rename = "303")]
    SeeOther,
    #[serde(rename = "307")]
    TemporaryRedirect,
    #[serde(rename = "308")]
    PermanentRedirect,
}

impl RedirectHttpCode {
    pub fn as_u16(&self) -> u16 {
        match self {
            RedirectHttpCode::MovedPermanently => 301,
            RedirectHttpCode::Found => 302,
            RedirectHttpCode::SeeOther => 303,
            RedirectHttpCode::TemporaryRedirect => 307,
            RedirectHttpCode::PermanentRedirect => 308,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectHttpCode::MovedPermanently => "301",
            RedirectHttpCode::Found => "302",
            RedirectHttpCode::SeeOther => "303",
            RedirectHttpCode::TemporaryRedirect => "307",
            RedirectHttpCode::PermanentRedirect => "308",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "301" => Some(RedirectHttpCode::MovedPermanently),
            "302" => Some(RedirectHttpCode::Found),
            "303" => Some(RedirectHttpCode::SeeOther),
            "307" => Some(RedirectHttpCode::TemporaryRedirect),
            "308" => Some(RedirectHttpCode::PermanentRedirect),
            _ => None,
        }
    }
}

// ── Derived markup ─────────────────────────────────────

/// Script fragment for the JavaScript redirect methods, empty for the others.
/// The layout is fixed: templates and tests match it byte for byte.
pub fn redirect_js_code(method: RedirectMethod, url: &str, delay: i64) -> String {
    let function_body = match method {
        RedirectMethod::JsHref => format!("window.location.href = '{}';", url),
        RedirectMethod::JsReplace => format!("window.location.replace('{}');", url),
        RedirectMethod::Http | RedirectMethod::Meta => return String::new(),
    };
    format!(
        "<script type=\"text/javascript\">setTimeout(\n    function() {{ {} }},\n    {},\n);</script>",
        function_body,
        delay.saturating_mul(1000)
    )
}

/// Meta-refresh tag used by the `meta` method.
pub fn redirect_meta_tag(url: &str, delay: i64) -> String {
    format!("<meta http-equiv=\"refresh\" content=\"{};url={}\"/>", delay, url)
}

// ── Page ───────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Page {
    pub id: i64,
    pub site_id: Option<i64>,
    pub name: String,
    pub url: String,
    pub content: String,
    pub is_published: bool,
    pub is_redirect: bool,
    pub redirect_method: RedirectMethod,
    pub redirect_url: Option<String>,
    pub redirect_http_code: Option<RedirectHttpCode>,
    pub redirect_delay: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageForm {
    pub site_id: Option<i64>,
    pub name: String,
    pub url: Option<String>,
    pub content: String,
    pub is_published: bool,
    pub is_redirect: bool,
    pub redirect_method: RedirectMethod,
    pub redirect_url: Option<String>,
    pub redirect_http_code: Option<RedirectHttpCode>,
    pub redirect_delay: i64,
}

impl Default for PageForm {
    fn default() -> Self {
        PageForm {
            site_id: None,
            name: String::new(),
            url: None,
            content: String::new(),
            is_published: false,
            is_redirect: false,
            redirect_method: RedirectMethod::Http,
            redirect_url: None,
            redirect_http_code: Some(RedirectHttpCode::MovedPermanently),
            redirect_delay: 0,
        }
    }
}

impl PageForm {
    /// URL the page will be stored under: the given one with a leading slash,
    /// or one derived from the name.
    pub fn resolved_url(&self) -> String {
        match self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(u) if u.starts_with('/') => u.to_string(),
            Some(u) => format!("/{}", u),
            None => format!("/{}", slug::slugify(&self.name)),
        }
    }
}

impl Page {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let method: String = row.get("redirect_method")?;
        let code: Option<String> = row.get("redirect_http_code")?;
        Ok(Page {
            id: row.get("id")?,
            site_id: row.get("site_id")?,
            name: row.get("name")?,
            url: row.get("url")?,
            content: row.get("content")?,
            is_published: row.get::<_, i64>("is_published")? != 0,
            is_redirect: row.get::<_, i64>("is_redirect")? != 0,
            redirect_method: RedirectMethod::parse(&method).unwrap_or_default(),
            redirect_url: row.get("redirect_url")?,
            redirect_http_code: code.as_deref().and_then(RedirectHttpCode::parse),
            redirect_delay: row.get("redirect_delay")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn redirect_url_or_empty(&self) -> &str {
        self.redirect_url.as_deref().unwrap_or("")
    }

    /// Always computed from the current fields, never cached.
    pub fn redirect_js_code(&self) -> String {
        redirect_js_code(
            self.redirect_method,
            self.redirect_url_or_empty(),
            self.redirect_delay,
        )
    }

    /// Markup the page layout places in `<head>` for client-side redirects.
    /// Empty unless the page redirects with a non-HTTP method.
    pub fn redirect_head(&self) -> String {
        if !self.is_redirect {
            return String::new();
        }
        match self.redirect_method {
            RedirectMethod::Http => String::new(),
            RedirectMethod::Meta => {
                redirect_meta_tag(self.redirect_url_or_empty(), self.redirect_delay)
            }
            RedirectMethod::JsHref | RedirectMethod::JsReplace => self.redirect_js_code(),
        }
    }

    /// JSON for the editing API, including the derived script.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "site_id": self.site_id,
            "name": self.name,
            "url": self.url,
            "content": self.content,
            "is_published": self.is_published,
            "is_redirect": self.is_redirect,
            "redirect_method": self.redirect_method,
            "redirect_url": self.redirect_url,
            "redirect_http_code": self.redirect_http_code,
            "redirect_delay": self.redirect_delay,
            "redirect_js_code": self.redirect_js_code(),
            "created_at": self.created_at,
            "updated_at": self.updated_at,
        })
    }

    // ── Lookups ──

    pub fn find_by_id(pool: &DbPool, id: i64) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row("SELECT * FROM pages WHERE id = ?1", params![id], Self::from_row)
            .ok()
    }

    /// Page the site serves at `url`: its own page first, then a shared one.
    pub fn resolve(pool: &DbPool, site_id: i64, url: &str) -> Option<Self> {
        let conn = pool.get().ok()?;
        conn.query_row(
            "SELECT * FROM pages WHERE url = ?1 AND (site_id = ?2 OR site_id IS NULL)
             ORDER BY site_id IS NULL, id ASC LIMIT 1",
            params![url, site_id],
            Self::from_row,
        )
        .ok()
    }

    /// First page at `url` across all sites, lowest site id first and shared
    /// pages last. Database failures are returned, not swallowed.
    pub fn find_first_by_url(pool: &DbPool, url: &str) -> Result<Option<Self>, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.query_row(
            "SELECT * FROM pages WHERE url = ?1
             ORDER BY site_id IS NULL, site_id ASC, id ASC LIMIT 1",
            params![url],
            Self::from_row,
        )
        .optional()
        .map_err(|e| e.to_string())
    }

    pub fn list(pool: &DbPool) -> Vec<Self> {
        let conn = match pool.get() {
            Ok(c) => c,
            Err(_) => return vec![],
        };
        let mut stmt = match conn
            .prepare("SELECT * FROM pages ORDER BY site_id IS NULL, site_id ASC, url ASC")
        {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        stmt.query_map([], Self::from_row)
            .map(|rows| rows.filter_map(|r| r.ok()).collect())
            .unwrap_or_default()
    }

    // ── Mutations ──

    pub fn create(pool: &DbPool, form: &PageForm) -> Result<i64, String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO pages (site_id, name, url, content, is_published, is_redirect,
                redirect_method, redirect_url, redirect_http_code, redirect_delay)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                form.site_id,
                form.name,
                form.resolved_url(),
                form.content,
                form.is_published as i64,
                form.is_redirect as i64,
                form.redirect_method.as_str(),
                form.redirect_url,
                form.redirect_http_code.map(|c| c.as_str()),
                form.redirect_delay,
            ],
        )
        .map_err(|e| e.to_string())?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(pool: &DbPool, id: i64, form: &PageForm) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        let changed = conn
            .execute(
                "UPDATE pages SET site_id = ?1, name = ?2, url = ?3, content = ?4,
                    is_published = ?5, is_redirect = ?6, redirect_method = ?7,
                    redirect_url = ?8, redirect_http_code = ?9, redirect_delay = ?10,
                    updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?11",
                params![
                    form.site_id,
                    form.name,
                    form.resolved_url(),
                    form.content,
                    form.is_published as i64,
                    form.is_redirect as i64,
                    form.redirect_method.as_str(),
                    form.redirect_url,
                    form.redirect_http_code.map(|c| c.as_str()),
                    form.redirect_delay,
                    id,
                ],
            )
            .map_err(|e| e.to_string())?;
        if changed == 0 {
            return Err(format!("page {} not found", id));
        }
        Ok(())
    }

    pub fn delete(pool: &DbPool, id: i64) -> Result<(), String> {
        let conn = pool.get().map_err(|e| e.to_string())?;
        conn.execute("DELETE FROM pages WHERE id = ?1", params![id])
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
