//! Root welcome page and the health probe.

use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::state::AppState;

pub async fn welcome() -> impl Responder {
    HttpResponse::Ok().body("Welcome to the Quill blogging API")
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "database": state.database_mode,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
