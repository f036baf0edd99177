#[macro_use]
extern crate rocket;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;
use log::info;
use std::sync::Arc;

mod boot;
mod config;
mod db;
mod models;
mod redirect;
mod render;
mod routes;
mod security;
mod site;
mod store;


use config::AppConfig;
use store::sqlite::SqliteStore;
use store::Store;

/// Keeps browsers and proxies from caching editing API responses.
pub struct NoCacheApi;

#[rocket::async_trait]
impl Fairing for NoCacheApi {
    fn info(&self) -> Info {
        Info { name: "No-Cache API", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        if req.uri().path().starts_with("/api") {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assemble the server around an already migrated store.
pub fn build_rocket(store: Arc<dyn Store>, config: AppConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("template_dir", config.server.template_dir.clone()));

    rocket::custom(figment)
        .manage(store)
        .manage(config)
        .attach(Template::fairing())
        .attach(NoCacheApi)
        .mount("/", routes::auth::routes())
        .mount("/api", routes::api::routes())
        .mount("/", routes::public::routes())
        .register("/", catchers![not_found, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = AppConfig::load();

    // Verify directories and critical templates before touching the database
    boot::run(&config);

    let pool = db::init_pool(&config.database).expect("Failed to initialize database pool");
    let store = SqliteStore::new(pool);
    store.run_migrations().expect("Failed to run database migrations");
    store
        .seed_defaults(&config.seed)
        .expect("Failed to seed default data");

    info!("Serving pages from {}", config.database.path);

    build_rocket(Arc::new(store) as Arc<dyn Store>, config)
}
