//! Tracking service layer
//!
//! 点击事件摄入、统计聚合与导出的业务逻辑，
//! HTTP handler 只做参数提取和响应包装。
//!
//! 统计响应的四个部分（totalCount / recentClicks / clickCounts / hourlyStats）
//! 并发查询，对调用方表现为一次逻辑读取，不承诺跨部分的事务一致性。

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{ClickTrackerError, Result};
use crate::storage::{ClickEvent, ClickMetadata, ClickRepository, NewClickEvent};

/// recentClicks 单页最大条数
const MAX_STATS_LIMIT: u64 = 1000;

/// hourlyStats 的回溯窗口
const HOURLY_WINDOW_HOURS: i64 = 24;

// ============ 请求/响应类型 ============

/// 点击事件摄入请求
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickRequest {
    pub button_id: Option<String>,
    pub button_text: Option<String>,
    pub session_id: Option<String>,
    /// 缺省时由服务端取摄入时刻
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Option<ClickMetadata>,
}

/// 统计响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStats {
    pub total_count: u64,
    pub recent_clicks: Vec<RecentClick>,
    pub click_counts: Vec<ClickCountGroup>,
    pub hourly_stats: Vec<HourlyStatGroup>,
    pub period: Period,
}

/// 最近点击（投影字段）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentClick {
    pub button_id: String,
    pub button_text: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: RecentClickMetadata,
}

/// 最近点击的元数据投影（只保留 variant/size）
#[derive(Debug, Clone, Serialize)]
pub struct RecentClickMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// 按钮分组统计
#[derive(Debug, Clone, Serialize)]
pub struct ClickCountGroup {
    #[serde(rename = "_id")]
    pub id: ClickCountKey,
    pub count: u64,
    #[serde(rename = "lastClicked")]
    pub last_clicked: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickCountKey {
    pub button_id: String,
    pub button_text: String,
}

/// 小时分桶统计
#[derive(Debug, Clone, Serialize)]
pub struct HourlyStatGroup {
    #[serde(rename = "_id")]
    pub id: HourlyStatKey,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyStatKey {
    pub hour: u32,
    pub date: String,
}

/// 分页信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub from: u64,
    pub limit: u64,
    pub has_more: bool,
}

// ============ TrackingService ============

/// 点击统计服务
pub struct TrackingService {
    repo: Arc<dyn ClickRepository>,
}

impl TrackingService {
    pub fn new(repo: Arc<dyn ClickRepository>) -> Self {
        Self { repo }
    }

    /// 摄入一条点击事件
    ///
    /// 校验必填字段后持久化；metadata.userAgent 始终以请求头为准
    /// （缺失时为 "Unknown"），覆盖调用方自带的值。
    pub async fn record_click(
        &self,
        req: TrackClickRequest,
        user_agent: Option<&str>,
    ) -> Result<ClickEvent> {
        let button_id = non_empty(req.button_id);
        let button_text = non_empty(req.button_text);
        let session_id = non_empty(req.session_id);

        let (Some(button_id), Some(button_text), Some(session_id)) =
            (button_id, button_text, session_id)
        else {
            return Err(ClickTrackerError::validation(
                "buttonId, buttonText, and sessionId are required",
            ));
        };

        let mut metadata = req.metadata.unwrap_or_default();
        metadata.user_agent = Some(user_agent.unwrap_or("Unknown").to_string());

        let event = NewClickEvent {
            button_id,
            button_text,
            user_id: None,
            session_id,
            clicked_at: req.timestamp.unwrap_or_else(Utc::now),
            metadata,
        };

        let persisted = self.repo.insert_click(event).await?;

        debug!(
            "Tracking: recorded click id={} button='{}' session='{}'",
            persisted.id, persisted.button_id, persisted.session_id
        );

        Ok(persisted)
    }

    /// 统计查询
    ///
    /// 四个部分使用 `tokio::try_join!` 并发执行。
    pub async fn get_stats(
        &self,
        button_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<TrackingStats> {
        info!(
            "Tracking: get_stats button_id={:?} limit={} offset={}",
            button_id, limit, offset
        );

        let limit = limit.min(MAX_STATS_LIMIT);
        let since = Utc::now() - Duration::hours(HOURLY_WINDOW_HOURS);

        let (total_count, recent_rows, count_rows, hourly_rows) = tokio::try_join!(
            self.repo.count_clicks(button_id),
            self.repo.recent_clicks(button_id, limit, offset),
            self.repo.click_counts(button_id),
            self.repo.hourly_stats(button_id, since),
        )?;

        let recent_clicks: Vec<RecentClick> = recent_rows
            .into_iter()
            .map(|row| RecentClick {
                button_id: row.button_id,
                button_text: row.button_text,
                timestamp: row.clicked_at,
                metadata: RecentClickMetadata {
                    variant: row.variant,
                    size: row.size,
                },
            })
            .collect();

        let click_counts: Vec<ClickCountGroup> = count_rows
            .into_iter()
            .map(|row| ClickCountGroup {
                id: ClickCountKey {
                    button_id: row.button_id,
                    button_text: row.button_text,
                },
                count: row.count as u64,
                last_clicked: row.last_clicked,
            })
            .collect();

        let hourly_stats: Vec<HourlyStatGroup> = hourly_rows
            .into_iter()
            .map(|row| HourlyStatGroup {
                id: HourlyStatKey {
                    hour: row.hour.parse().unwrap_or(0),
                    date: row.date,
                },
                count: row.count as u64,
            })
            .collect();

        debug!(
            "Tracking: get_stats returned total={} recent={} groups={} buckets={}",
            total_count,
            recent_clicks.len(),
            click_counts.len(),
            hourly_stats.len()
        );

        Ok(TrackingStats {
            total_count,
            recent_clicks,
            click_counts,
            hourly_stats,
            period: Period {
                from: offset,
                limit,
                has_more: total_count > offset + limit,
            },
        })
    }

    /// 导出时间范围内的全部事件，按时间倒序
    ///
    /// 日期解析失败时退化为开区间，与统计口径一致的宽松处理。
    pub async fn export(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<ClickEvent>> {
        let start = start_date.and_then(Self::parse_date);
        let end = end_date.and_then(Self::parse_date);

        info!("Tracking: export start={:?} end={:?}", start, end);

        let events = self.repo.export_clicks(start, end).await?;

        debug!("Tracking: export returned {} records", events.len());

        Ok(events)
    }

    /// 解析日期，支持 RFC3339 和 YYYY-MM-DD 格式
    pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_rfc3339() {
        let dt = TrackingService::parse_date("2026-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.date_naive().to_string(), "2026-01-15");
    }

    #[test]
    fn test_parse_date_yyyy_mm_dd() {
        let dt = TrackingService::parse_date("2026-01-15").unwrap();
        assert_eq!(dt.date_naive().to_string(), "2026-01-15");
        assert_eq!(dt.format("%H:%M:%S").to_string(), "00:00:00");
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(TrackingService::parse_date("not-a-date").is_none());
        assert!(TrackingService::parse_date("").is_none());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }
}
