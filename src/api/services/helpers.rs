//! API 帮助函数
//!
//! 所有失败响应统一为 `{"error": <message>}`。

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::json;

use crate::errors::ClickTrackerError;

/// 构建错误响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}

/// 从 ClickTrackerError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_from_tracker(err: &ClickTrackerError) -> HttpResponse {
    error_response(err.http_status(), err.message())
}
