pub mod health;
pub mod historical;
pub mod session;

use actix_web::{error, web, HttpResponse};
use crate::models::ApiResponse;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::config)
        .configure(session::config)
        .configure(historical::config);
}

/// 请求体校验失败统一返回 422，不会触达 Breeze
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("请求体校验失败: {}", err);
        let response = HttpResponse::UnprocessableEntity().json(ApiResponse::<()>::error(err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}
