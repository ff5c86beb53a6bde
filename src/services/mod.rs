//! 业务逻辑服务模块
//!
//! 封装 Breeze 接入和会话管理

pub mod breeze;          // Breeze 接口客户端
pub mod session_manager; // 会话管理

pub use session_manager::SessionManager;
