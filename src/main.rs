//! Breeze 网关服务
//!
//! 对接 ICICI Direct Breeze API，提供会话初始化和历史K线查询的 HTTP 接口

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Condition, Logger},
    web, App, Error, HttpServer,
};
use anyhow::Context;
use env_logger::Env;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::breeze::BreezeConnect;
use crate::services::SessionManager;

/// 组装应用：跨域只放行配置的前端地址，配置了 api_key 才启用 Bearer Token 认证
fn build_app(
    manager: web::Data<SessionManager>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors = Cors::default()
        .allowed_origin(&config.cors.allowed_origin)
        .allow_any_method()
        .allow_any_header()
        .supports_credentials();
    let api_key = config.api.api_key.clone();
    let auth_enabled = !api_key.is_empty();

    App::new()
        .app_data(manager)
        .app_data(handlers::json_config())
        .wrap(Condition::new(auth_enabled, ApiKeyMiddleware::new(api_key)))
        .wrap(cors)
        .wrap(Logger::default())  // 添加请求日志中间件
        .configure(handlers::config)
}

/// 应用程序入口
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    let connector = BreezeConnect::new(&config.breeze, &config.api)?;
    let manager = web::Data::new(SessionManager::new(Arc::new(connector)));

    if config.api.api_key.is_empty() {
        log::warn!("未设置 API_KEY，网关不启用 Bearer Token 认证");
    }

    let bind_addr = config.bind_addr();
    let workers = config.server.workers;
    log::info!(
        "启动 Breeze 网关服务, 监听 {}, 允许前端 {}",
        bind_addr,
        config.cors.allowed_origin
    );

    let mut server = HttpServer::new(move || build_app(manager.clone(), &config));
    if workers > 0 {
        server = server.workers(workers);
    }

    server
        .bind(&bind_addr)
        .with_context(|| format!("绑定地址 {} 失败", bind_addr))?
        .run()
        .await?;
    Ok(())
}
