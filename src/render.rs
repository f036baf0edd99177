use pulldown_cmark::{html, Options, Parser};
use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::Request;
use rocket_dyn_templates::Template;
use serde_json::json;

use crate::models::page::Page;
use crate::models::site::Site;
use crate::security::auth::Viewer;

/// A rendered page as produced by the serving pipeline, before the
/// redirect hook has had its say.
pub struct Draft {
    /// Pages render with 200; the redirect hook only acts on 200 drafts
    /// and passes every other status through untouched.
    pub status: Status,
    pub body: Template,
}

impl<'r> Responder<'r, 'static> for Draft {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        Response::build_from(self.body.respond_to(req)?)
            .status(self.status)
            .ok()
    }
}

/// Renders a page through the `page` template.
/// Editors get the page without redirect markup so they can stay on it.
pub fn render_page(site: &Site, page: &Page, viewer: &Viewer) -> Draft {
    let can_edit = viewer.can_edit_pages();
    let redirect_head = if can_edit {
        String::new()
    } else {
        page.redirect_head()
    };

    let context = json!({
        "site": site,
        "page": page,
        "content_html": markdown_to_html(&page.content),
        "redirect_head": redirect_head,
        "redirect_url": page.redirect_url_or_empty(),
        "redirect_method": page.redirect_method.as_str(),
        "viewer_can_edit": can_edit,
    });

    Draft {
        status: Status::Ok,
        body: Template::render("page", context),
    }
}

pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
