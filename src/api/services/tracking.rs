//! Tracking API 端点
//!
//! - POST /tracking/button-click：摄入点击事件
//! - GET  /tracking/stats：统计查询
//! - GET  /tracking/export：导出（需要 Bearer token）

use actix_web::http::StatusCode;
use actix_web::http::header::USER_AGENT;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::errors::ClickTrackerError;
use crate::services::{TrackClickRequest, TrackingService};
use crate::storage::ClickEvent;

use super::helpers::{error_from_tracker, error_response};

/// recentClicks 默认单页条数
const DEFAULT_STATS_LIMIT: u64 = 100;

// ============ 请求/响应类型 ============

/// 统计查询参数
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub button_id: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// 导出查询参数
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub format: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// 摄入成功响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickResponse {
    pub message: String,
    pub click_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// JSON 导出响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub exported_at: DateTime<Utc>,
    pub total_records: usize,
    pub data: Vec<ClickEvent>,
}

/// CSV 导出行（字段顺序即列顺序）
#[derive(Debug, Serialize)]
struct CsvClickRow {
    timestamp: String,
    #[serde(rename = "buttonId")]
    button_id: String,
    #[serde(rename = "buttonText")]
    button_text: String,
    #[serde(rename = "sessionId")]
    session_id: String,
    variant: String,
    size: String,
    page: String,
    #[serde(rename = "userAgent")]
    user_agent: String,
}

impl From<ClickEvent> for CsvClickRow {
    fn from(event: ClickEvent) -> Self {
        Self {
            timestamp: event.timestamp.to_rfc3339(),
            button_id: event.button_id,
            button_text: event.button_text,
            session_id: event.session_id,
            variant: event.metadata.variant.unwrap_or_default(),
            size: event.metadata.size.unwrap_or_default(),
            page: event.metadata.page.unwrap_or_default(),
            user_agent: event.metadata.user_agent.unwrap_or_default(),
        }
    }
}

// ============ API 端点 ============

/// POST /tracking/button-click - 摄入点击事件
pub async fn track_button_click(
    req: HttpRequest,
    body: web::Json<TrackClickRequest>,
    service: web::Data<Arc<TrackingService>>,
) -> ActixResult<HttpResponse> {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok());

    match service.record_click(body.into_inner(), user_agent).await {
        Ok(event) => Ok(HttpResponse::Created().json(TrackClickResponse {
            message: "Button click tracked successfully".to_string(),
            click_id: event.id,
            timestamp: event.timestamp,
        })),
        Err(err @ ClickTrackerError::Validation(_)) => Ok(error_from_tracker(&err)),
        Err(err) => {
            error!("Track button click error: {}", err);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to track button click",
            ))
        }
    }
}

/// GET /tracking/stats - 统计查询
pub async fn get_tracking_stats(
    query: web::Query<StatsQuery>,
    service: web::Data<Arc<TrackingService>>,
) -> ActixResult<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_STATS_LIMIT);
    let offset = query.offset.unwrap_or(0);

    match service
        .get_stats(query.button_id.as_deref(), limit, offset)
        .await
    {
        Ok(stats) => Ok(HttpResponse::Ok().json(stats)),
        Err(err) => {
            error!("Get tracking stats error: {}", err);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve tracking statistics",
            ))
        }
    }
}

/// GET /tracking/export - 导出点击数据（BearerAuth 之后）
pub async fn export_tracking_data(
    query: web::Query<ExportQuery>,
    service: web::Data<Arc<TrackingService>>,
) -> ActixResult<HttpResponse> {
    let events = match service
        .export(query.start_date.as_deref(), query.end_date.as_deref())
        .await
    {
        Ok(events) => events,
        Err(err) => {
            error!("Export tracking data error: {}", err);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to export tracking data",
            ));
        }
    };

    if query.format.as_deref() == Some("csv") {
        return Ok(csv_export_response(events));
    }

    Ok(HttpResponse::Ok().json(ExportResponse {
        exported_at: Utc::now(),
        total_records: events.len(),
        data: events,
    }))
}

/// 生成 CSV 附件响应，所有字段带引号，缺失字段为空串
fn csv_export_response(events: Vec<ClickEvent>) -> HttpResponse {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(vec![]);

    for event in events {
        if let Err(e) = writer.serialize(CsvClickRow::from(event)) {
            error!("Failed to serialize CSV row: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to export tracking data",
            );
        }
    }

    let bytes = match writer.into_inner() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to finalize CSV writer: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to export tracking data",
            );
        }
    };

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"button-clicks.csv\"",
        ))
        .body(bytes)
}
