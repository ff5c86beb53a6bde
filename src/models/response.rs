//! 通用 API 响应模型
//!
//! 定义统一的 API 响应格式

use chrono::Utc;
use chrono_tz::Asia::Kolkata;
use serde::{Deserialize, Serialize};

/// 获取印度标准时间（UTC+5:30），与 Breeze 交易时间一致
pub fn get_ist_time() -> chrono::DateTime<chrono_tz::Tz> {
    Utc::now().with_timezone(&Kolkata)
}

/// 统一 API 响应结构
///
/// - success: 请求是否成功
/// - data: 响应数据（有数据的接口才出现）
/// - message: 提示信息（有提示的接口才出现）
/// - detail: 错误详情（失败时出现，原样透传上游错误）
/// - timestamp: 响应时间戳（印度标准时间）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建带数据的成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            detail: None,
            timestamp: get_ist_time().to_rfc3339(),
        }
    }

    /// 创建错误响应
    pub fn error(detail: String) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            detail: Some(detail),
            timestamp: get_ist_time().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    /// 创建只带提示信息的成功响应
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            detail: None,
            timestamp: get_ist_time().to_rfc3339(),
        }
    }
}
