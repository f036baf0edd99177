use log::{error, info, warn};
use rocket::form::Form;
use rocket::http::{CookieJar, Status};
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::security::auth::{self, ClientIp, SESSION_COOKIE};
use crate::store::Store;

#[derive(Debug, FromForm)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn login_template(error: Option<&str>) -> Template {
    Template::render("login", json!({ "error": error }))
}

#[get("/login")]
pub fn login_page() -> Template {
    login_template(None)
}

#[post("/login", data = "<form>")]
pub fn login_submit(
    form: Form<LoginForm>,
    store: &State<Arc<dyn Store>>,
    config: &State<AppConfig>,
    cookies: &CookieJar<'_>,
    client_ip: ClientIp,
) -> Result<Redirect, (Status, Template)> {
    let s: &dyn Store = &**store.inner();
    let denied = || (Status::Unauthorized, login_template(Some("Invalid email or password.")));

    let user = match s.user_get_by_email(form.email.trim()) {
        Some(user) if user.is_active() => user,
        _ => {
            warn!("Failed login for {}", form.email.trim());
            return Err(denied());
        }
    };

    if !auth::verify_password(&form.password, &user.password_hash) {
        warn!("Failed login for {}", user.email);
        return Err(denied());
    }

    let session_id =
        auth::create_session(s, user.id, config.session.expiry_hours, Some(&client_ip.0))
            .map_err(|e| {
                error!("Could not create session for {}: {}", user.email, e);
                (
                    Status::InternalServerError,
                    login_template(Some("Could not sign you in. Please try again.")),
                )
            })?;

    s.session_cleanup_expired();
    auth::set_session_cookie(cookies, &session_id);
    info!("{} signed in", user.email);
    Ok(Redirect::to("/"))
}

#[post("/logout")]
pub fn logout(store: &State<Arc<dyn Store>>, cookies: &CookieJar<'_>) -> Redirect {
    if let Some(cookie) = cookies.get_private(SESSION_COOKIE) {
        let _ = auth::destroy_session(&**store.inner(), cookie.value());
    }
    auth::clear_session_cookie(cookies);
    Redirect::to("/")
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login_page, login_submit, logout]
}
