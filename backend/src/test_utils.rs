//! Shared fixtures for handler tests: a seeded in-memory database behind the full route table.

use actix_web::{body::MessageBody, dev::ServiceResponse, test, web};

use crate::config::Config;
use crate::db::Database;
use crate::services::SeedService;
use crate::AppState;

pub async fn test_state() -> web::Data<AppState> {
    let db = Database::in_memory().await.unwrap();
    db.run_migrations().await.unwrap();

    let config = Config::default();
    SeedService::new(&db)
        .seed_defaults(&config.default_lists, &config.default_tags)
        .await
        .unwrap();

    web::Data::new(AppState { db })
}

macro_rules! init_app {
    () => {{
        let state = $crate::test_utils::test_state().await;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(state)
                .configure($crate::routes::configure),
        )
        .await
    }};
}

pub(crate) use init_app;

pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    test::read_body_json(resp).await
}
