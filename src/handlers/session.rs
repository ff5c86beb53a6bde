use actix_web::{web, HttpResponse, Result};
use crate::models::{ApiResponse, SessionCredentials};
use crate::services::SessionManager;

pub const SESSION_INITIALIZED: &str = "Session initialized successfully";

/// 初始化 Breeze 会话
///
/// POST /init-session
///
/// 凭证被拒绝时返回 400，detail 为 Breeze 原始错误信息
pub async fn init_session(
    manager: web::Data<SessionManager>,
    body: web::Json<SessionCredentials>,
) -> Result<HttpResponse> {
    let credentials = body.into_inner();

    match manager.initialize(&credentials).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message(SESSION_INITIALIZED))),
        Err(e) => {
            let response = ApiResponse::<()>::error(e.to_string());
            Ok(HttpResponse::BadRequest().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/init-session", web::post().to(init_session));
}
