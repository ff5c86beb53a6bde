//! Breeze 相关数据模型
//!
//! 请求体字段全部按原样透传给 Breeze，本服务只校验 `right` 的取值

use serde::{Deserialize, Serialize};

/// 初始化会话的凭证，只在建立会话时使用一次
#[derive(Clone, Deserialize)]
pub struct SessionCredentials {
    pub api_key: String,
    #[allow(dead_code)]
    pub secret_key: String,
    pub session_token: String,
}

// 凭证不进日志
impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("api_key", &"***")
            .field("secret_key", &"***")
            .field("session_token", &"***")
            .finish()
    }
}

/// 期权方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl OptionRight {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionRight::Call => "call",
            OptionRight::Put => "put",
        }
    }
}

/// 历史K线查询参数
///
/// 除 `right` 外均为 Breeze 定义的字符串，格式由 Breeze 校验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalDataQuery {
    /// K线周期，如 1minute / 5minute / 1day
    pub interval: String,
    /// 开始时间（ISO 8601）
    pub from_date: String,
    /// 结束时间（ISO 8601）
    pub to_date: String,
    /// Breeze 股票代码，如 NIFTY
    pub stock_code: String,
    /// 交易所，如 NSE / NFO
    pub exchange_code: String,
    /// 产品类型，如 options / futures / cash
    pub product_type: String,
    /// 到期日
    pub expiry_date: String,
    pub right: OptionRight,
    /// 行权价
    pub strike_price: String,
}

/// 当前会话概况，用于健康检查，不包含任何令牌
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub user_id: String,
    /// 建立时间（RFC 3339，印度标准时间）
    pub established_at: String,
}
