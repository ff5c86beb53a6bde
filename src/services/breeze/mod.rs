//! Breeze 交易接口
//!
//! 对接 ICICI Direct Breeze API，仅包含建立会话和历史K线（v2）两个调用
//!
//! ## 数据来源
//! - https://api.icicidirect.com/breezeapi/api/v1/customerdetails
//! - https://breezeapi.icicidirect.com/api/v2/historicalcharts

mod client;
#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::models::{HistoricalDataQuery, SessionCredentials};

pub use client::BreezeConnect;

/// 凭证被拒绝且上游没有给出原因时的提示
pub const AUTH_FAILED_MESSAGE: &str = "Could not authenticate credentials. Please check token and keys";

#[derive(Debug, thiserror::Error)]
pub enum BreezeError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Authentication(String),
    #[error("无法解析 session_token: {0}")]
    InvalidToken(String),
    #[error("Breeze 返回数据格式异常: {0}")]
    InvalidResponse(String),
    #[error("Breeze 会话未初始化，请先调用 /init-session")]
    SessionNotInitialized,
}

/// 已认证的 Breeze 会话句柄
#[async_trait]
pub trait BrokerSession: Send + Sync {
    fn user_id(&self) -> &str;

    /// 查询历史K线，返回 Breeze 原始 JSON（包含 Success / Status / Error）
    async fn get_historical_data_v2(&self, query: &HistoricalDataQuery) -> Result<Value, BreezeError>;
}

/// 用凭证换取会话句柄
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    async fn generate_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Arc<dyn BrokerSession>, BreezeError>;
}
