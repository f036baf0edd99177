//! Page resolver hook.
//!
//! Runs after the page-serving pipeline has produced its draft response and
//! decides whether that draft goes out as-is or is replaced by an HTTP
//! redirect. Only the `http` method is handled here; `meta` and the two
//! JavaScript methods travel inside the rendered page itself.

use log::{debug, error};
use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::Request;
use url::Url;

use crate::models::page::{Page, RedirectMethod};
use crate::render::Draft;
use crate::security::auth::Viewer;
use crate::store::Store;

// ── Redirect response ──────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRedirect {
    pub location: String,
    pub status: Status,
    /// Same-origin redirect: scheme and authority were stripped.
    pub local: bool,
}

impl PageRedirect {
    pub fn for_page(page: &Page) -> Self {
        let url = page.redirect_url_or_empty();
        let status = Status::new(page.redirect_http_code.unwrap_or_default().as_u16());
        let local = !url.to_lowercase().starts_with("http");
        let location = if local {
            local_location(url)
        } else {
            url.to_string()
        };
        PageRedirect {
            location,
            status,
            local,
        }
    }
}

impl<'r> Responder<'r, 'static> for PageRedirect {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .status(self.status)
            .raw_header("Location", self.location)
            .ok()
    }
}

/// Strips scheme and authority so a local redirect can never leave the site.
/// The path is kept as written: `foo/bar` becomes `/foo/bar`,
/// `//other.example/x` becomes `/x`, `../admin` becomes `/../admin`.
pub fn local_location(url: &str) -> String {
    let mut rest = url.trim();

    if let Ok(parsed) = Url::parse(rest) {
        let prefix_len = parsed.scheme().len() + 1;
        if rest
            .get(..prefix_len)
            .map_or(false, |p| p.eq_ignore_ascii_case(&format!("{}:", parsed.scheme())))
        {
            rest = &rest[prefix_len..];
        }
    }

    if let Some(authority) = rest.strip_prefix("//") {
        let end = authority.find(|c| matches!(c, '/' | '?' | '#')).unwrap_or(authority.len());
        rest = &authority[end..];
    }

    format!("/{}", rest.trim_start_matches('/'))
}

// ── Decision ───────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
pub enum Decision {
    PassThrough,
    Redirect(PageRedirect),
}

/// Decide what to do with a draft whose status is `draft_status`
/// (`None` when the pipeline produced nothing for `path`).
pub fn decide(
    draft_status: Option<Status>,
    path: &str,
    viewer: &Viewer,
    store: &dyn Store,
) -> Result<Decision, String> {
    // Only pages the host actually served are candidates; leave errors,
    // misses and the host's own redirects alone
    if draft_status != Some(Status::Ok) {
        return Ok(Decision::PassThrough);
    }

    let page = match store.page_find_first_by_url(path)? {
        Some(page) => page,
        None => {
            error!("Served page not found for URL {}", path);
            return Ok(Decision::PassThrough);
        }
    };

    if viewer.is_authenticated() && viewer.can_edit_pages() {
        return Ok(Decision::PassThrough);
    }

    if !page.is_redirect || page.redirect_method != RedirectMethod::Http {
        return Ok(Decision::PassThrough);
    }

    let redirect = PageRedirect::for_page(&page);
    debug!(
        "Redirecting {} to {} ({}, local={})",
        path, redirect.location, redirect.status.code, redirect.local
    );
    Ok(Decision::Redirect(redirect))
}

// ── Hook ───────────────────────────────────────────────

/// What the page route finally sends.
pub enum PageReply {
    Draft(Draft),
    Redirect(PageRedirect),
}

impl<'r> Responder<'r, 'static> for PageReply {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        match self {
            PageReply::Draft(draft) => draft.respond_to(req),
            PageReply::Redirect(redirect) => redirect.respond_to(req),
        }
    }
}

/// Apply the redirect decision to a draft. A failing page lookup is a
/// store fault and fails the request with 500.
pub fn intercept(
    draft: Option<Draft>,
    path: &str,
    viewer: &Viewer,
    store: &dyn Store,
) -> Result<Option<PageReply>, Status> {
    let decision = decide(draft.as_ref().map(|d| d.status), path, viewer, store).map_err(|e| {
        error!("Page lookup failed for URL {}: {}", path, e);
        Status::InternalServerError
    })?;

    Ok(match decision {
        Decision::PassThrough => draft.map(PageReply::Draft),
        Decision::Redirect(redirect) => Some(PageReply::Redirect(redirect)),
    })
}
