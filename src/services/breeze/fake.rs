//! 测试用的假 Breeze 连接器

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{BreezeError, BrokerConnector, BrokerSession};
use crate::models::{HistoricalDataQuery, SessionCredentials};

/// 以 api_key 作为 user_id 的假连接器
#[derive(Default)]
pub struct FakeConnector {
    /// 设置后所有凭证都被拒绝
    pub reject_with: Option<String>,
    /// 按 api_key 拒绝，值为错误信息
    pub rejected_keys: HashMap<String, String>,
    /// 历史查询返回的原始 payload
    pub payload: Value,
    /// 设置后历史查询失败
    pub query_error: Option<String>,
    /// 按 api_key 指定建立会话前的延迟
    pub delays: HashMap<String, Duration>,
    pub connects: AtomicUsize,
    pub queries: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn accepting(payload: Value) -> Self {
        Self {
            payload,
            ..Default::default()
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerConnector for FakeConnector {
    async fn generate_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Arc<dyn BrokerSession>, BreezeError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&credentials.api_key) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(message) = self
            .reject_with
            .as_ref()
            .or_else(|| self.rejected_keys.get(&credentials.api_key))
        {
            return Err(BreezeError::Authentication(message.clone()));
        }
        Ok(Arc::new(FakeSession {
            user_id: credentials.api_key.clone(),
            payload: self.payload.clone(),
            query_error: self.query_error.clone(),
            queries: self.queries.clone(),
        }))
    }
}

pub struct FakeSession {
    user_id: String,
    payload: Value,
    query_error: Option<String>,
    queries: Arc<AtomicUsize>,
}

#[async_trait]
impl BrokerSession for FakeSession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn get_historical_data_v2(&self, _query: &HistoricalDataQuery) -> Result<Value, BreezeError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        match &self.query_error {
            Some(message) => Err(BreezeError::InvalidResponse(message.clone())),
            None => Ok(self.payload.clone()),
        }
    }
}
