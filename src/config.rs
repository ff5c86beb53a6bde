//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，并允许环境变量覆盖

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 网关 Bearer Token（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 请求 Breeze 的超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 允许访问的前端地址
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

/// Breeze 接口地址
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreezeConfig {
    /// v1 接口根地址（customerdetails）
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// v2 接口根地址（historicalcharts）
    #[serde(default = "default_historical_base_url")]
    pub historical_base_url: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub breeze: BreezeConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_allowed_origin() -> String { "http://localhost:3000".to_string() }
fn default_api_base_url() -> String { "https://api.icicidirect.com/breezeapi/api/v1/".to_string() }
fn default_historical_base_url() -> String { "https://breezeapi.icicidirect.com/api/v2/".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
        }
    }
}

impl Default for BreezeConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            historical_base_url: default_historical_base_url(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件 {} 失败", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 {} 失败", path.display()))?;
        Ok(config)
    }

    /// 加载配置：优先从文件，没有文件则使用默认值，最后应用环境变量
    ///
    /// 文件存在但无法解析时直接报错，不静默回退
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// 用环境变量覆盖配置项
    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_KEY") {
            self.api.api_key = v;
        }
        if let Some(v) = lookup("FRONTEND_ORIGIN") {
            self.cors.allowed_origin = v;
        }
        if let Some(v) = lookup("BREEZE_API_BASE_URL") {
            self.breeze.api_base_url = v;
        }
        if let Some(v) = lookup("BREEZE_HISTORICAL_BASE_URL") {
            self.breeze.historical_base_url = v;
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
