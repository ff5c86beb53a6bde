//! Breeze HTTP 客户端实现

use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{BreezeError, BrokerConnector, BrokerSession, AUTH_FAILED_MESSAGE};
use crate::config::{ApiConfig, BreezeConfig};
use crate::models::{HistoricalDataQuery, SessionCredentials};

/// Breeze 连接器，所有会话共用同一个 HTTP 连接池
pub struct BreezeConnect {
    client: Client,
    customer_details_url: Url,
    historical_url: Url,
}

impl BreezeConnect {
    pub fn new(breeze: &BreezeConfig, api: &ApiConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout_from_secs(api.timeout_secs) {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = timeout_from_secs(api.connect_timeout_secs) {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().context("创建 HTTP 客户端失败")?;

        let customer_details_url = parse_base(&breeze.api_base_url)?
            .join("customerdetails")
            .context("拼接 customerdetails 地址失败")?;
        let historical_url = parse_base(&breeze.historical_base_url)?
            .join("historicalcharts")
            .context("拼接 historicalcharts 地址失败")?;

        Ok(Self {
            client,
            customer_details_url,
            historical_url,
        })
    }
}

/// 0 表示不限制超时
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// 解析根地址；`Url::join` 要求以 `/` 结尾，否则最后一段会被替换
fn parse_base(raw: &str) -> anyhow::Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&normalized).with_context(|| format!("无效的 Breeze 地址: {}", raw))
}

#[async_trait]
impl BrokerConnector for BreezeConnect {
    async fn generate_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Arc<dyn BrokerSession>, BreezeError> {
        // customerdetails 是带 JSON body 的 GET 请求
        let body = json!({
            "SessionToken": credentials.session_token,
            "AppKey": credentials.api_key,
        });

        let payload: Value = self
            .client
            .get(self.customer_details_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?
            .json()
            .await?;

        let session_token = extract_session_token(&payload)?;
        let user_id = decode_user_id(&session_token)?;
        log::debug!("customerdetails 返回 user_id={}", user_id);

        Ok(Arc::new(BreezeSession {
            client: self.client.clone(),
            historical_url: self.historical_url.clone(),
            api_key: credentials.api_key.clone(),
            user_id,
            session_token,
        }))
    }
}

/// 从 customerdetails 响应中取出 base64 格式的 session_token
fn extract_session_token(payload: &Value) -> Result<String, BreezeError> {
    if let Some(token) = payload
        .get("Success")
        .and_then(|s| s.get("session_token"))
        .and_then(Value::as_str)
    {
        return Ok(token.to_string());
    }

    let message = payload
        .get("Error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(AUTH_FAILED_MESSAGE);
    Err(BreezeError::Authentication(message.to_string()))
}

/// session_token 解码后格式为 `<user_id>:<session_key>`
fn decode_user_id(session_token: &str) -> Result<String, BreezeError> {
    let raw = STANDARD
        .decode(session_token)
        .map_err(|e| BreezeError::InvalidToken(e.to_string()))?;
    let text = String::from_utf8(raw).map_err(|e| BreezeError::InvalidToken(e.to_string()))?;
    let (user_id, _session_key) = text
        .split_once(':')
        .ok_or_else(|| BreezeError::InvalidToken("缺少 ':' 分隔符".to_string()))?;
    Ok(user_id.to_string())
}

/// 已认证的 Breeze 会话
pub struct BreezeSession {
    client: Client,
    historical_url: Url,
    api_key: String,
    user_id: String,
    session_token: String,
}

#[async_trait]
impl BrokerSession for BreezeSession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn get_historical_data_v2(&self, query: &HistoricalDataQuery) -> Result<Value, BreezeError> {
        let payload = self
            .client
            .get(self.historical_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header("X-SessionToken", self.session_token.as_str())
            .header("apikey", self.api_key.as_str())
            .query(&historical_params(query))
            .send()
            .await?
            .json::<Value>()
            .await?;

        Ok(payload)
    }
}

/// historicalcharts 的查询参数，可选字段为空时不发送
fn historical_params(query: &HistoricalDataQuery) -> Vec<(&'static str, &str)> {
    let mut params = vec![
        ("stock_code", query.stock_code.as_str()),
        ("exch_code", query.exchange_code.as_str()),
        ("from_date", query.from_date.as_str()),
        ("to_date", query.to_date.as_str()),
        ("interval", query.interval.as_str()),
    ];
    let optional = [
        ("product_type", query.product_type.as_str()),
        ("expiry_date", query.expiry_date.as_str()),
        ("right", query.right.as_str()),
        ("strike_price", query.strike_price.as_str()),
    ];
    params.extend(optional.into_iter().filter(|(_, v)| !v.is_empty()));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OptionRight;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use std::collections::HashMap;

    const USER_ID: &str = "U123456";

    async fn customer_details(body: web::Json<Value>) -> HttpResponse {
        if body["SessionToken"] == "good-token" && body["AppKey"] == "app-key" {
            let token = STANDARD.encode(format!("{}:session-key", USER_ID));
            HttpResponse::Ok().json(json!({
                "Success": {"session_token": token, "idirect_userid": USER_ID},
                "Status": 200,
                "Error": null
            }))
        } else {
            HttpResponse::Ok().json(json!({
                "Success": null,
                "Status": 500,
                "Error": "Public Key does not exist."
            }))
        }
    }

    async fn historical_charts(
        req: HttpRequest,
        query: web::Query<HashMap<String, String>>,
    ) -> HttpResponse {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        HttpResponse::Ok().json(json!({
            "Success": [{
                "params": query.into_inner(),
                "session_token": header("X-SessionToken"),
                "apikey": header("apikey")
            }],
            "Status": 200,
            "Error": null
        }))
    }

    /// 启动一个本地假 Breeze 服务，返回根地址
    fn spawn_fake_breeze() -> String {
        let server = HttpServer::new(|| {
            App::new()
                .route("/v1/customerdetails", web::get().to(customer_details))
                .route("/v2/historicalcharts", web::get().to(historical_charts))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    fn connector(base: &str) -> BreezeConnect {
        let breeze = BreezeConfig {
            api_base_url: format!("{}/v1", base),
            historical_base_url: format!("{}/v2/", base),
        };
        BreezeConnect::new(&breeze, &ApiConfig::default()).unwrap()
    }

    fn credentials(session_token: &str) -> SessionCredentials {
        SessionCredentials {
            api_key: "app-key".to_string(),
            secret_key: "secret".to_string(),
            session_token: session_token.to_string(),
        }
    }

    fn query() -> HistoricalDataQuery {
        HistoricalDataQuery {
            interval: "5minute".to_string(),
            from_date: "2024-01-01T09:15:00.000Z".to_string(),
            to_date: "2024-01-01T15:30:00.000Z".to_string(),
            stock_code: "NIFTY".to_string(),
            exchange_code: "NFO".to_string(),
            product_type: "options".to_string(),
            expiry_date: String::new(),
            right: OptionRight::Put,
            strike_price: "21500".to_string(),
        }
    }

    #[test]
    fn test_parse_base_appends_slash() {
        let url = parse_base("https://api.icicidirect.com/breezeapi/api/v1").unwrap();
        assert_eq!(
            url.join("customerdetails").unwrap().as_str(),
            "https://api.icicidirect.com/breezeapi/api/v1/customerdetails"
        );
        assert!(parse_base("not a url").is_err());
    }

    #[test]
    fn test_zero_timeout_means_unlimited() {
        assert_eq!(timeout_from_secs(0), None);
        assert_eq!(timeout_from_secs(30), Some(Duration::from_secs(30)));

        let api = ApiConfig {
            timeout_secs: 0,
            connect_timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert!(BreezeConnect::new(&BreezeConfig::default(), &api).is_ok());
    }

    #[actix_web::test]
    async fn test_zero_timeout_still_reaches_breeze() {
        let base = spawn_fake_breeze();
        let breeze = BreezeConfig {
            api_base_url: format!("{}/v1", base),
            historical_base_url: format!("{}/v2", base),
        };
        let api = ApiConfig {
            timeout_secs: 0,
            ..ApiConfig::default()
        };
        let connector = BreezeConnect::new(&breeze, &api).unwrap();

        let session = connector.generate_session(&credentials("good-token")).await.unwrap();
        assert_eq!(session.user_id(), USER_ID);
    }

    #[test]
    fn test_extract_session_token_uses_vendor_error() {
        let err = extract_session_token(&json!({"Success": "", "Error": "Session key is expired."}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Session key is expired.");

        let err = extract_session_token(&json!({"Status": 500})).unwrap_err();
        assert_eq!(err.to_string(), AUTH_FAILED_MESSAGE);
    }

    #[test]
    fn test_decode_user_id() {
        let token = STANDARD.encode("AB1234:k3y:with:colons");
        assert_eq!(decode_user_id(&token).unwrap(), "AB1234");
        assert!(matches!(decode_user_id("%%%"), Err(BreezeError::InvalidToken(_))));
        let no_colon = STANDARD.encode("nocolon");
        assert!(matches!(decode_user_id(&no_colon), Err(BreezeError::InvalidToken(_))));
    }

    #[test]
    fn test_historical_params_skip_empty_optionals() {
        let q = query();
        let params: HashMap<_, _> = historical_params(&q).into_iter().collect();
        assert_eq!(params["exch_code"], "NFO");
        assert_eq!(params["right"], "put");
        assert_eq!(params["strike_price"], "21500");
        assert!(!params.contains_key("expiry_date"));
        assert!(!params.contains_key("exchange_code"));
    }

    #[actix_web::test]
    async fn test_generate_session_and_query() {
        let base = spawn_fake_breeze();
        let connector = connector(&base);

        let session = connector.generate_session(&credentials("good-token")).await.unwrap();
        assert_eq!(session.user_id(), USER_ID);

        let payload = session.get_historical_data_v2(&query()).await.unwrap();
        let record = &payload["Success"][0];
        assert_eq!(record["apikey"], "app-key");
        assert_eq!(
            record["session_token"],
            STANDARD.encode(format!("{}:session-key", USER_ID))
        );
        assert_eq!(record["params"]["stock_code"], "NIFTY");
        assert_eq!(record["params"]["interval"], "5minute");
        assert!(record["params"].get("expiry_date").is_none());
    }

    #[actix_web::test]
    async fn test_generate_session_rejected() {
        let base = spawn_fake_breeze();
        let connector = connector(&base);

        let err = match connector.generate_session(&credentials("bad-token")).await {
            Ok(_) => panic!("bad token should be rejected"),
            Err(e) => e,
        };
        assert!(matches!(err, BreezeError::Authentication(_)));
        assert_eq!(err.to_string(), "Public Key does not exist.");
    }
}
