use rocket::http::{RawStr, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use std::sync::Arc;

use crate::redirect::{self, PageReply};
use crate::render;
use crate::security::auth::Viewer;
use crate::site::CurrentSite;
use crate::store::Store;

/// Percent-decoded request path, e.g. `/about-us`.
pub struct RequestPath(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestPath {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let raw = RawStr::new(request.uri().path().as_str());
        Outcome::Success(RequestPath(raw.percent_decode_lossy().into_owned()))
    }
}

// ── Page serving ───────────────────────────────────────

/// Serves CMS pages by URL. Ranked after every other route so it only
/// sees paths nothing else claimed.
#[get("/<_..>", rank = 20)]
pub fn serve_page(
    store: &State<Arc<dyn Store>>,
    site: CurrentSite,
    viewer: Viewer,
    path: RequestPath,
) -> Result<PageReply, Status> {
    let s: &dyn Store = &**store.inner();

    // Unpublished pages are only visible to editors
    let draft = s
        .page_resolve(site.0.id, &path.0)
        .filter(|page| page.is_published || viewer.can_edit_pages())
        .map(|page| render::render_page(&site.0, &page, &viewer));

    redirect::intercept(draft, &path.0, &viewer, s)?.ok_or(Status::NotFound)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![serve_page]
}
