//! Routes shared by `/lists` and `/tags`. The scope registers which
//! [`CatalogKind`] it serves as app data.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::catalog::{CatalogEntryForm, CatalogEntryResponse, OwnerQuery},
    models::CatalogKind,
    services::CatalogService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(get_entries))
            .route(web::post().to(create_new_entry)),
    )
    .service(web::resource("/{id}").route(web::delete().to(delete_entry_by_id)));
}

/// GET /?userId= - Shared entries plus the caller's own
async fn get_entries(
    state: web::Data<AppState>,
    kind: web::Data<CatalogKind>,
    query: web::Query<OwnerQuery>,
) -> AppResult<HttpResponse> {
    let entries = CatalogService::new(&state.db, **kind)
        .get_entries(query.user_id.as_deref())
        .await?;

    let response: Vec<CatalogEntryResponse> =
        entries.into_iter().map(CatalogEntryResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// POST / - Create a user entry; (name, owner) must be unique
async fn create_new_entry(
    state: web::Data<AppState>,
    kind: web::Data<CatalogKind>,
    form_data: web::Json<CatalogEntryForm>,
) -> AppResult<HttpResponse> {
    let kind = **kind;
    let name = form_data.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::Validation(format!("{} name is required", kind.label())));
    }
    let owner = form_data.user_id.as_deref();

    let service = CatalogService::new(&state.db, kind);
    if service.find_by_name(name, owner).await?.is_some() {
        return Err(AppError::Conflict(service.already_exists()));
    }

    let entry = service.insert_new_entry(name, owner).await?;
    tracing::info!("{} \"{}\" created", kind.label(), entry.name);

    Ok(HttpResponse::Created().json(CatalogEntryResponse::from(entry)))
}

/// DELETE /{id}?userId= - Defaults are protected; owned entries only by their owner
async fn delete_entry_by_id(
    state: web::Data<AppState>,
    kind: web::Data<CatalogKind>,
    path: web::Path<String>,
    query: web::Query<OwnerQuery>,
) -> AppResult<HttpResponse> {
    let kind = **kind;
    let entry_id = path.into_inner();
    let service = CatalogService::new(&state.db, kind);

    let entry = service
        .get_entry_by_id(&entry_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", kind.label())))?;

    if entry.is_default {
        return Err(AppError::Forbidden(format!(
            "Cannot delete default {}",
            kind.table()
        )));
    }

    if entry.is_owned_by_other(query.user_id.as_deref()) {
        return Err(AppError::Forbidden("Unauthorized".to_string()));
    }

    service.delete_entry_by_id(&entry_id).await?;
    tracing::info!("{} \"{}\" deleted", kind.label(), entry.name);

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{} deleted successfully", kind.label())
    })))
}
