pub mod catalog;
pub mod health;
pub mod todos;

use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::models::CatalogKind;

/// Mounts every route of the service, including the fallback for unknown paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/", web::get().to(health::health_check))
        .service(web::scope("/api").configure(create_routes))
        .default_service(web::to(not_found));
}

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/health/db", web::get().to(health::health_check_db))
        .service(web::scope("/todos").configure(todos::create_routes))
        .service(
            web::scope("/lists")
                .app_data(web::Data::new(CatalogKind::List))
                .configure(catalog::create_routes),
        )
        .service(
            web::scope("/tags")
                .app_data(web::Data::new(CatalogKind::Tag))
                .configure(catalog::create_routes),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid request body: {}", err)).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid query string: {}", err)).into())
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "message": "Route Not Found!!" }))
}
