use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use std::sync::Arc;

use crate::models::site::Site;
use crate::store::Store;

/// The site a request is addressed to, picked by `Host` header.
/// Unknown hosts fall back to the default (oldest) site.
pub struct CurrentSite(pub Site);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentSite {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let store = match request.guard::<&State<Arc<dyn Store>>>().await.succeeded() {
            Some(s) => s,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };

        let hostname = request
            .headers()
            .get_one("Host")
            .map(strip_port)
            .unwrap_or("");

        let site = if hostname.is_empty() {
            None
        } else {
            store.site_find_by_hostname(hostname)
        };

        match site.or_else(|| store.site_default()) {
            Some(site) => Outcome::Success(CurrentSite(site)),
            None => Outcome::Error((Status::NotFound, ())),
        }
    }
}

/// `example.com:8000` -> `example.com`, `[::1]:8000` -> `[::1]`
pub fn strip_port(host: &str) -> &str {
    let host = host.trim();
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
