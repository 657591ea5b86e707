//! Tracking HTTP client
//!
//! 面向非浏览器调用方的请求封装：JSON 请求体、会话 id 注入、
//! 导出接口的 Bearer header 注入。

mod session;

pub use session::{
    MemorySessionStore, SESSION_FALLBACK_ID, SESSION_STORAGE_KEY, SessionStore,
    get_or_create_session_id,
};

use std::sync::OnceLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use ureq::Agent;

use crate::storage::ClickMetadata;

/// HTTP 请求超时时间
const HTTP_TIMEOUT_SECS: u64 = 5;

/// 全局 HTTP Agent（ureq 的 Agent 是 Send + Sync）
static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// 客户端错误
#[derive(Debug)]
pub enum ClientError {
    Http(String),
    Decode(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(msg) => write!(f, "HTTP error: {}", msg),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        ClientError::Http(err.to_string())
    }
}

/// 摄入接口响应
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResult {
    pub message: String,
    pub click_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// Tracking API 客户端
pub struct TrackingClient {
    base_url: String,
    store: Option<MemorySessionStore>,
}

impl TrackingClient {
    /// 创建带会话存储的客户端（同一客户端的所有事件共享会话 id）
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            store: Some(MemorySessionStore::new()),
        }
    }

    /// 创建无会话存储的客户端，统一使用固定哨兵会话 id
    pub fn without_session_store(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            store: None,
        }
    }

    /// 当前会话 id（必要时生成）
    pub fn session_id(&self) -> String {
        match &self.store {
            Some(store) => get_or_create_session_id(store),
            None => SESSION_FALLBACK_ID.to_string(),
        }
    }

    /// 构造摄入请求体（会话 id 在这里注入）
    fn build_track_body(
        &self,
        button_id: &str,
        button_text: &str,
        metadata: &ClickMetadata,
    ) -> serde_json::Value {
        json!({
            "buttonId": button_id,
            "buttonText": button_text,
            "sessionId": self.session_id(),
            "metadata": metadata,
        })
    }

    /// 上报一次按钮点击
    pub fn track_button_click(
        &self,
        button_id: &str,
        button_text: &str,
        metadata: &ClickMetadata,
    ) -> Result<TrackResult, ClientError> {
        let url = format!("{}/tracking/button-click", self.base_url);
        let body = self.build_track_body(button_id, button_text, metadata);

        let resp = get_agent().post(&url).send_json(&body)?;

        resp.into_body()
            .read_json::<TrackResult>()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// 查询统计数据
    pub fn get_tracking_stats(
        &self,
        button_id: Option<&str>,
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/tracking/stats", self.base_url);

        let mut request = get_agent().get(&url);
        if let Some(id) = button_id {
            request = request.query("buttonId", id);
        }

        let resp = request.call()?;

        resp.into_body()
            .read_json::<serde_json::Value>()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// 导出 JSON 数据（需要 Bearer token）
    pub fn export_json(
        &self,
        token: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<serde_json::Value, ClientError> {
        let resp = self.export_request("json", token, start_date, end_date)?;

        resp.into_body()
            .read_json::<serde_json::Value>()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// 导出 CSV 数据（需要 Bearer token）
    pub fn export_csv(
        &self,
        token: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<String, ClientError> {
        let resp = self.export_request("csv", token, start_date, end_date)?;

        resp.into_body()
            .read_to_string()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn export_request(
        &self,
        format: &str,
        token: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ureq::http::Response<ureq::Body>, ClientError> {
        let url = format!("{}/tracking/export", self.base_url);

        let mut request = get_agent()
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .query("format", format);
        if let Some(start) = start_date {
            request = request.query("startDate", start);
        }
        if let Some(end) = end_date {
            request = request.query("endDate", end);
        }

        Ok(request.call()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_reused_across_calls() {
        let client = TrackingClient::new("http://localhost:5100/api");
        assert_eq!(client.session_id(), client.session_id());
    }

    #[test]
    fn test_sentinel_without_store() {
        let client = TrackingClient::without_session_store("http://localhost:5100/api");
        assert_eq!(client.session_id(), SESSION_FALLBACK_ID);
    }

    #[test]
    fn test_build_track_body_injects_session_id() {
        let client = TrackingClient::new("http://localhost:5100/api");
        let metadata = ClickMetadata {
            variant: Some("primary".to_string()),
            page: Some("/".to_string()),
            ..Default::default()
        };

        let body = client.build_track_body("submit-btn", "Submit", &metadata);

        assert_eq!(body["buttonId"], "submit-btn");
        assert_eq!(body["buttonText"], "Submit");
        assert_eq!(body["sessionId"], client.session_id());
        assert_eq!(body["metadata"]["variant"], "primary");
        assert_eq!(body["metadata"]["page"], "/");
    }
}
