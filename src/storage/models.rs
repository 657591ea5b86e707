use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 点击事件元数据
///
/// 类型化核心字段（variant/size/page/userAgent）+ 额外键透传。
/// 调用方附带的其他元数据键进入 `extra`，序列化时平铺回对象。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClickMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(rename = "userAgent", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// 持久化后的点击事件
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub id: i64,
    pub button_id: String,
    pub button_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub session_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub metadata: ClickMetadata,
}

/// 待持久化的点击事件（id 由存储层分配）
#[derive(Debug, Clone)]
pub struct NewClickEvent {
    pub button_id: String,
    pub button_text: String,
    pub user_id: Option<String>,
    pub session_id: String,
    pub clicked_at: chrono::DateTime<chrono::Utc>,
    pub metadata: ClickMetadata,
}
