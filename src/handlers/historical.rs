use actix_web::{web, HttpResponse, Result};
use serde_json::Value;
use crate::models::{ApiResponse, HistoricalDataQuery};
use crate::services::breeze::BreezeError;
use crate::services::SessionManager;

/// 获取历史K线数据
///
/// POST /historical
///
/// 只返回 Breeze 响应中的 `Success` 字段，其余字段（Status、Error 等）丢弃。
/// 会话缺失或任何调用失败都返回 500，detail 为原始错误文本。
pub async fn get_historical_data(
    manager: web::Data<SessionManager>,
    body: web::Json<HistoricalDataQuery>,
) -> Result<HttpResponse> {
    let query = body.into_inner();
    log::debug!("历史数据查询: {:?}", query);

    match fetch_historical_records(&manager, &query).await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data))),
        Err(e) => {
            log::warn!("获取历史数据失败: {}", e);
            let response = ApiResponse::<Value>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

async fn fetch_historical_records(
    manager: &SessionManager,
    query: &HistoricalDataQuery,
) -> std::result::Result<Value, BreezeError> {
    let session = manager
        .current()
        .await
        .ok_or(BreezeError::SessionNotInitialized)?;
    let payload = session.get_historical_data_v2(query).await?;
    extract_success(payload)
}

/// 取出 `Success` 字段，缺失时为空数组
fn extract_success(payload: Value) -> std::result::Result<Value, BreezeError> {
    match payload {
        Value::Object(mut fields) => Ok(fields
            .remove("Success")
            .unwrap_or_else(|| Value::Array(Vec::new()))),
        other => Err(BreezeError::InvalidResponse(format!(
            "期望 JSON 对象，实际为 {}",
            other
        ))),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/historical", web::post().to(get_historical_data));
}
