use chrono::{Duration, Utc};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::models::user::User;
use crate::store::Store;

pub const SESSION_COOKIE: &str = "velocty_session";

// ── Client IP request guard ──

/// Extracts the real client IP from the request.
/// Checks headers in priority order:
///   1. X-Real-IP (nginx proxy_set_header)
///   2. X-Forwarded-For (first IP in the chain = original client)
///   3. Rocket's client_ip() (socket peer address)
pub struct ClientIp(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = request.headers();

        if let Some(ip) = headers.get_one("X-Real-IP") {
            let ip = ip.trim();
            if !ip.is_empty() {
                return Outcome::Success(ClientIp(ip.to_string()));
            }
        }

        // X-Forwarded-For: client, proxy1, proxy2; take the leftmost
        if let Some(forwarded) = headers.get_one("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return Outcome::Success(ClientIp(ip.to_string()));
                }
            }
        }

        let ip = request
            .client_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Outcome::Success(ClientIp(ip))
    }
}

// ── Viewer guard (anonymous or signed in, never fails) ──

/// Whoever is looking at the current request.
pub struct Viewer {
    pub user: Option<User>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Viewer { user: None }
    }

    pub fn signed_in(user: User) -> Self {
        Viewer { user: Some(user) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True when the session belongs to a user with the page editing
    /// capability. Such users are never redirected away from pages.
    pub fn can_edit_pages(&self) -> bool {
        self.user.as_ref().map(User::can_edit_pages).unwrap_or(false)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Viewer {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(Viewer {
            user: resolve_session_user(request).await,
        })
    }
}

// ── Editor guard ──

/// Guard: requires role = admin or editor on an active account.
pub struct EditorUser {
    pub user: User,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for EditorUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match resolve_session_user(request).await {
            Some(user) if user.can_edit_pages() => Outcome::Success(EditorUser { user }),
            Some(_) => Outcome::Error((Status::Forbidden, ())),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

// ── Shared session resolution ──

async fn resolve_session_user(request: &Request<'_>) -> Option<User> {
    let store = request
        .guard::<&State<Arc<dyn Store>>>()
        .await
        .succeeded()?;
    let cookies = request.cookies();
    let session_id = cookies.get_private(SESSION_COOKIE)?.value().to_string();

    match store.session_get_user(&session_id) {
        Some(user) if user.is_active() => Some(user),
        _ => {
            cookies.remove_private(Cookie::from(SESSION_COOKIE));
            None
        }
    }
}

// ── Password utilities ──

pub fn hash_password(password: &str) -> Result<String, String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| e.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

// ── Session management ──

pub fn create_session(
    store: &dyn Store,
    user_id: i64,
    expiry_hours: i64,
    ip: Option<&str>,
) -> Result<String, String> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let expires = Utc::now().naive_utc() + Duration::hours(expiry_hours.max(1));
    let expires_str = expires.format("%Y-%m-%d %H:%M:%S").to_string();
    let ip_hash = ip.map(hash_ip);

    store.session_create(user_id, &session_id, &expires_str, ip_hash.as_deref())?;

    Ok(session_id)
}

pub fn destroy_session(store: &dyn Store, session_id: &str) -> Result<(), String> {
    store.session_delete(session_id)
}

pub fn set_session_cookie(cookies: &CookieJar<'_>, session_id: &str) {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookies.add_private(cookie);
}

pub fn clear_session_cookie(cookies: &CookieJar<'_>) {
    cookies.remove_private(Cookie::from(SESSION_COOKIE));
}

pub fn hash_ip(ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}
