use log::{error, info};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::Value;
use std::sync::Arc;

use crate::models::page::PageForm;
use crate::security::auth::EditorUser;
use crate::store::Store;

// ── Page editing API (editors only) ────────────────────

fn store_error(e: String) -> Status {
    if e.contains("UNIQUE") {
        Status::Conflict
    } else {
        error!("Page store error: {}", e);
        Status::InternalServerError
    }
}

fn validate(form: &PageForm) -> Result<(), Status> {
    if form.name.trim().is_empty() {
        return Err(Status::UnprocessableEntity);
    }
    if let Some(site_id) = form.site_id {
        if site_id <= 0 {
            return Err(Status::UnprocessableEntity);
        }
    }
    Ok(())
}

#[get("/pages")]
pub fn page_list(_editor: EditorUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    let pages: Vec<Value> = store.page_list().iter().map(|p| p.to_json()).collect();
    Json(Value::Array(pages))
}

#[get("/pages/<id>")]
pub fn page_get(_editor: EditorUser, store: &State<Arc<dyn Store>>, id: i64) -> Option<Json<Value>> {
    store.page_find_by_id(id).map(|p| Json(p.to_json()))
}

#[post("/pages", format = "json", data = "<form>")]
pub fn page_create(
    editor: EditorUser,
    store: &State<Arc<dyn Store>>,
    form: Json<PageForm>,
) -> Result<(Status, Json<Value>), Status> {
    validate(&form)?;
    if let Some(site_id) = form.site_id {
        store.site_find_by_id(site_id).ok_or(Status::UnprocessableEntity)?;
    }

    let id = store.page_create(&form).map_err(store_error)?;
    let page = store.page_find_by_id(id).ok_or(Status::InternalServerError)?;
    info!("{} created page {} ({})", editor.user.email, page.url, id);
    Ok((Status::Created, Json(page.to_json())))
}

#[put("/pages/<id>", format = "json", data = "<form>")]
pub fn page_update(
    editor: EditorUser,
    store: &State<Arc<dyn Store>>,
    id: i64,
    form: Json<PageForm>,
) -> Result<Json<Value>, Status> {
    validate(&form)?;
    store.page_find_by_id(id).ok_or(Status::NotFound)?;
    if let Some(site_id) = form.site_id {
        store.site_find_by_id(site_id).ok_or(Status::UnprocessableEntity)?;
    }

    store.page_update(id, &form).map_err(store_error)?;
    let page = store.page_find_by_id(id).ok_or(Status::InternalServerError)?;
    info!("{} updated page {} ({})", editor.user.email, page.url, id);
    Ok(Json(page.to_json()))
}

#[delete("/pages/<id>")]
pub fn page_delete(editor: EditorUser, store: &State<Arc<dyn Store>>, id: i64) -> Status {
    if store.page_find_by_id(id).is_none() {
        return Status::NotFound;
    }
    match store.page_delete(id) {
        Ok(()) => {
            info!("{} deleted page {}", editor.user.email, id);
            Status::NoContent
        }
        Err(e) => store_error(e),
    }
}

#[get("/sites")]
pub fn site_list(_editor: EditorUser, store: &State<Arc<dyn Store>>) -> Json<Value> {
    Json(serde_json::to_value(store.site_list()).unwrap_or_default())
}

pub fn routes() -> Vec<rocket::Route> {
    routes![page_list, page_get, page_create, page_update, page_delete, site_list]
}
