//! 中间件模块

mod api_key;

pub use api_key::ApiKeyMiddleware;
