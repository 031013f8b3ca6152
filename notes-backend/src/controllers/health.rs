use actix_web::{web, HttpResponse, Responder};

use crate::error::ApiError;
use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
    cfg.service(web::resource("/api/health/store").route(web::get().to(store_status)));
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION
    }))
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}

/// Round-trips the store so a broken database shows up as a 500 here
async fn store_status(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let notes = state.db.count_notes()?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "notes": notes
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::SCHEMA;
    use crate::db::Database;
    use crate::models::NoteDraft;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_and_version() {
        let app = test::init_service(App::new().configure(config_routes)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"status": "ok", "version": VERSION}));

        let req = test::TestRequest::get().uri("/api/version").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"version": VERSION}));
    }

    #[actix_web::test]
    async fn test_store_status_counts_notes() {
        let db = Database::in_memory().unwrap();
        db.init_schema(SCHEMA).unwrap();
        db.create_note(&NoteDraft::new("a", "b")).unwrap();
        let state = web::Data::new(AppState { db: Arc::new(db) });

        let app =
            test::init_service(App::new().app_data(state).configure(config_routes)).await;

        let req = test::TestRequest::get().uri("/api/health/store").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"status": "ok", "notes": 1}));
    }

    #[actix_web::test]
    async fn test_store_status_reports_missing_schema() {
        // No schema applied, so the notes table does not exist
        let state = web::Data::new(AppState {
            db: Arc::new(Database::in_memory().unwrap()),
        });
        let app =
            test::init_service(App::new().app_data(state).configure(config_routes)).await;

        let req = test::TestRequest::get().uri("/api/health/store").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
