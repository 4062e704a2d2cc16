use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::todo::{TodoForm, TodoResponse, TodoUpdateForm},
    services::TodoService,
    AppState,
};

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(get_todos))
            .route(web::post().to(create_new_todo)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_todo_by_id))
            .route(web::put().to(update_todo_by_id))
            .route(web::delete().to(delete_todo_by_id)),
    );
}

/// GET / - All todos, newest first
async fn get_todos(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let todos = TodoService::new(&state.db).get_todos().await?;

    let response: Vec<TodoResponse> = todos.into_iter().map(TodoResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /{id}
async fn get_todo_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let todo_id = path.into_inner();

    let todo = TodoService::new(&state.db)
        .get_todo_by_id(&todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))?;

    Ok(HttpResponse::Ok().json(TodoResponse::from(todo)))
}

/// POST / - Create a todo; id, completion and timestamps are assigned here
async fn create_new_todo(
    state: web::Data<AppState>,
    form_data: web::Json<TodoForm>,
) -> AppResult<HttpResponse> {
    form_data.validate()?;

    let todo = TodoService::new(&state.db)
        .insert_new_todo(&form_data)
        .await?;
    tracing::info!("Todo {} created", todo.id);

    Ok(HttpResponse::Created().json(TodoResponse::from(todo)))
}

/// PUT /{id} - Partial update, responds with the full record
async fn update_todo_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
    form_data: web::Json<TodoUpdateForm>,
) -> AppResult<HttpResponse> {
    let todo_id = path.into_inner();
    form_data.validate()?;

    let todo = TodoService::new(&state.db)
        .update_todo_by_id(&todo_id, &form_data)
        .await?;

    Ok(HttpResponse::Ok().json(TodoResponse::from(todo)))
}

/// DELETE /{id} - Idempotent
async fn delete_todo_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let todo_id = path.into_inner();

    if TodoService::new(&state.db)
        .delete_todo_by_id(&todo_id)
        .await?
    {
        tracing::info!("Todo {} deleted", todo_id);
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{init_app, read_json};
    use actix_web::{http::StatusCode, test};
    use serde_json::json;

    #[actix_web::test]
    async fn test_todo_lifecycle() {
        let app = init_app!();

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "Buy milk" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = read_json(resp).await;
        let id = created["_id"].as_str().unwrap().to_string();
        assert_eq!(created["completed"], false);
        assert!(created["createdAt"].is_string());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/todos").to_request()).await;
        let all = read_json(resp).await;
        assert!(all.as_array().unwrap().iter().any(|t| t["_id"] == id.as_str()));

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", id))
            .set_json(json!({ "completed": true }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let updated = read_json(resp).await;
        assert_eq!(updated["completed"], true);
        assert_eq!(updated["title"], "Buy milk");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/todos/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["message"], "Todo deleted successfully");

        let req = test::TestRequest::get()
            .uri(&format!("/api/todos/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(resp).await["message"], "Todo not found");
    }

    #[actix_web::test]
    async fn test_update_title_round_trip() {
        let app = init_app!();

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/lists").to_request()).await;
        let lists = read_json(resp).await;
        let list_id = lists[0]["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({
                "title": "Draft report",
                "description": "quarterly",
                "list": list_id,
                "dueDate": "2025-06-30",
                "tags": []
            }))
            .to_request();
        let before = read_json(test::call_service(&app, req).await).await;
        let id = before["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", id))
            .set_json(json!({ "title": "X" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/todos/{}", id))
            .to_request();
        let after = read_json(test::call_service(&app, req).await).await;
        assert_eq!(after["title"], "X");
        for field in ["description", "list", "dueDate", "tags", "completed", "starred", "createdAt"] {
            assert_eq!(after[field], before[field], "field {} changed", field);
        }
    }

    #[actix_web::test]
    async fn test_toggle_twice_restores_completion() {
        let app = init_app!();

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "Stretch" }))
            .to_request();
        let created = read_json(test::call_service(&app, req).await).await;
        let uri = format!("/api/todos/{}", created["_id"].as_str().unwrap());

        for completed in [true, false] {
            let req = test::TestRequest::put()
                .uri(&uri)
                .set_json(json!({ "completed": completed }))
                .to_request();
            let body = read_json(test::call_service(&app, req).await).await;
            assert_eq!(body["completed"], completed);
        }
    }

    #[actix_web::test]
    async fn test_invalid_payloads() {
        let app = init_app!();

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(resp).await["message"], "Title is required");

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "Ghost", "list": "no-such-list" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(resp).await["message"], "List not found");

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri("/api/todos/missing")
            .set_json(json!({ "completed": true }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_is_idempotent() {
        let app = init_app!();

        let req = test::TestRequest::delete().uri("/api/todos/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
