//! Breeze 会话管理
//!
//! 整个进程只保留一个会话：成功初始化会覆盖旧会话，失败会清空会话。
//! 外部调用期间不持有锁，并发初始化以最后一次写入为准；
//! 读取方拿到的是 `Arc` 快照，会话被替换不影响正在进行的查询。

use chrono::DateTime;
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{get_ist_time, SessionCredentials, SessionStatus};
use crate::services::breeze::{BreezeError, BrokerConnector, BrokerSession};

struct ActiveSession {
    handle: Arc<dyn BrokerSession>,
    established_at: DateTime<Tz>,
}

pub struct SessionManager {
    connector: Arc<dyn BrokerConnector>,
    current: RwLock<Option<ActiveSession>>,
}

impl SessionManager {
    pub fn new(connector: Arc<dyn BrokerConnector>) -> Self {
        Self {
            connector,
            current: RwLock::new(None),
        }
    }

    /// 用凭证建立新会话并替换当前会话
    ///
    /// 失败时当前会话被清空，错误信息原样返回
    pub async fn initialize(&self, credentials: &SessionCredentials) -> Result<(), BreezeError> {
        match self.connector.generate_session(credentials).await {
            Ok(handle) => {
                log::info!("✅ Breeze 会话已建立, user_id={}", handle.user_id());
                *self.current.write().await = Some(ActiveSession {
                    handle,
                    established_at: get_ist_time(),
                });
                Ok(())
            }
            Err(e) => {
                log::warn!("❌ Breeze 会话初始化失败: {}", e);
                *self.current.write().await = None;
                Err(e)
            }
        }
    }

    /// 当前会话句柄，不检查是否仍然有效
    pub async fn current(&self) -> Option<Arc<dyn BrokerSession>> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.handle.clone())
    }

    pub async fn status(&self) -> Option<SessionStatus> {
        self.current.read().await.as_ref().map(|session| SessionStatus {
            user_id: session.handle.user_id().to_string(),
            established_at: session.established_at.to_rfc3339(),
        })
    }
}
