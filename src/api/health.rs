//! Liveness probe

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub started_at: String,
    pub known_numbers: usize,
}

/// Always returns 200 OK while the process is serving.
#[get("/health/live")]
pub async fn liveness(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at.to_rfc3339(),
        known_numbers: state.registry.len(),
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness);
}
