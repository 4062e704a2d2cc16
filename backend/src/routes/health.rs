use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppResult;
use crate::AppState;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Task Manager API is running!!" }))
}

pub async fn health_check_db(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    sqlx::query("SELECT 1").execute(state.db.pool()).await?;

    Ok(HttpResponse::Ok().json(json!({ "status": true })))
}
