use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use crate::models::{ApiResponse, SessionStatus};
use crate::services::SessionManager;

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    session: Option<SessionStatus>,
}

pub async fn health_check(manager: web::Data<SessionManager>) -> Result<HttpResponse> {
    let report = HealthReport {
        status: "ok",
        session: manager.status().await,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
