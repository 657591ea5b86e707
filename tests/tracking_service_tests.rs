//! TrackingService 集成测试
//!
//! 覆盖 record_click 的校验与持久化、get_stats 的四个部分、
//! export 的日期过滤，以及数据保留任务。

use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use tempfile::TempDir;

use clicktracker::config::init_config;
use clicktracker::services::retention::DataRetentionTask;
use clicktracker::services::{TrackClickRequest, TrackingService};
use clicktracker::storage::backend::SeaOrmStorage;
use clicktracker::storage::{ClickMetadata, ClickRepository, NewClickEvent};

// =============================================================================
// 全局初始化
// =============================================================================

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    init_static_config();
    let td = TempDir::new().unwrap();
    let p = td.path().join("tracking_svc_test.db");
    let u = format!("sqlite://{}?mode=rwc", p.display());
    let s = SeaOrmStorage::new(&u, "sqlite").await.unwrap();
    (Arc::new(s), td)
}

fn make_request(button_id: &str, button_text: &str, session_id: &str) -> TrackClickRequest {
    TrackClickRequest {
        button_id: Some(button_id.to_string()),
        button_text: Some(button_text.to_string()),
        session_id: Some(session_id.to_string()),
        timestamp: None,
        metadata: None,
    }
}

/// 直接写入带指定时间戳的事件（绕过 service 的时间分配）
async fn insert_at(
    repo: &Arc<SeaOrmStorage>,
    button_id: &str,
    clicked_at: chrono::DateTime<Utc>,
) -> i64 {
    let event = NewClickEvent {
        button_id: button_id.to_string(),
        button_text: button_id.to_uppercase(),
        user_id: None,
        session_id: "s-fixed".to_string(),
        clicked_at,
        metadata: ClickMetadata {
            user_agent: Some("test-agent".to_string()),
            ..Default::default()
        },
    };
    repo.insert_click(event).await.unwrap().id
}

// =============================================================================
// record_click 测试
// =============================================================================

#[tokio::test]
async fn test_record_click_persists_submitted_fields() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let mut req = make_request("submit-btn", "Submit", "s1");
    req.metadata = Some(ClickMetadata {
        variant: Some("primary".to_string()),
        size: Some("lg".to_string()),
        page: Some("/components".to_string()),
        ..Default::default()
    });

    let event = service
        .record_click(req, Some("Mozilla/5.0 (test)"))
        .await
        .unwrap();

    assert!(event.id > 0);
    assert_eq!(event.button_id, "submit-btn");
    assert_eq!(event.button_text, "Submit");
    assert_eq!(event.session_id, "s1");
    assert_eq!(event.metadata.variant.as_deref(), Some("primary"));
    assert_eq!(event.metadata.size.as_deref(), Some("lg"));
    assert_eq!(event.metadata.page.as_deref(), Some("/components"));
    assert_eq!(event.metadata.user_agent.as_deref(), Some("Mozilla/5.0 (test)"));
}

#[tokio::test]
async fn test_record_click_defaults_user_agent_to_unknown() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let event = service
        .record_click(make_request("a", "A", "s1"), None)
        .await
        .unwrap();

    // 提交的 metadata 没有 userAgent 时也必须有值
    assert_eq!(event.metadata.user_agent.as_deref(), Some("Unknown"));
}

#[tokio::test]
async fn test_record_click_overrides_caller_user_agent() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let mut req = make_request("a", "A", "s1");
    req.metadata = Some(ClickMetadata {
        user_agent: Some("spoofed".to_string()),
        ..Default::default()
    });

    let event = service.record_click(req, Some("real-agent")).await.unwrap();

    // 请求头优先于调用方自带的 userAgent
    assert_eq!(event.metadata.user_agent.as_deref(), Some("real-agent"));
}

#[tokio::test]
async fn test_record_click_keeps_extra_metadata_keys() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let mut metadata = ClickMetadata::default();
    metadata
        .extra
        .insert("theme".to_string(), serde_json::json!("dark"));
    metadata
        .extra
        .insert("position".to_string(), serde_json::json!(3));

    let mut req = make_request("a", "A", "s1");
    req.metadata = Some(metadata);

    let event = service.record_click(req, None).await.unwrap();

    assert_eq!(event.metadata.extra["theme"], serde_json::json!("dark"));
    assert_eq!(event.metadata.extra["position"], serde_json::json!(3));
}

#[tokio::test]
async fn test_record_click_rejects_missing_fields() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let cases = vec![
        TrackClickRequest {
            button_id: None,
            ..make_request("x", "X", "s1")
        },
        TrackClickRequest {
            button_text: Some(String::new()),
            ..make_request("x", "X", "s1")
        },
        TrackClickRequest {
            session_id: None,
            ..make_request("x", "X", "s1")
        },
    ];

    for req in cases {
        let result = service.record_click(req, None).await;
        assert!(result.is_err());
    }

    // 校验失败的请求一条都不应落库
    let repo = storage.clone() as Arc<dyn ClickRepository>;
    assert_eq!(repo.count_clicks(None).await.unwrap(), 0);
}

// =============================================================================
// get_stats 测试
// =============================================================================

#[tokio::test]
async fn test_stats_total_count_independent_of_pagination() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    for i in 0..7 {
        service
            .record_click(make_request("btn", "Btn", &format!("s{}", i)), None)
            .await
            .unwrap();
    }

    let full = service.get_stats(None, 100, 0).await.unwrap();
    let paged = service.get_stats(None, 2, 4).await.unwrap();

    assert_eq!(full.total_count, 7);
    assert_eq!(paged.total_count, 7);
    assert_eq!(paged.recent_clicks.len(), 2);
    assert!(paged.period.has_more);
    assert_eq!(paged.period.from, 4);
    assert_eq!(paged.period.limit, 2);
    assert!(!full.period.has_more);
}

#[tokio::test]
async fn test_stats_click_counts_sum_equals_total() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    for _ in 0..3 {
        service
            .record_click(make_request("alpha", "Alpha", "s1"), None)
            .await
            .unwrap();
    }
    for _ in 0..2 {
        service
            .record_click(make_request("beta", "Beta", "s1"), None)
            .await
            .unwrap();
    }
    service
        .record_click(make_request("gamma", "Gamma", "s2"), None)
        .await
        .unwrap();

    let stats = service.get_stats(None, 100, 0).await.unwrap();

    let sum: u64 = stats.click_counts.iter().map(|g| g.count).sum();
    assert_eq!(sum, stats.total_count);
    assert_eq!(stats.total_count, 6);

    // count 降序
    assert_eq!(stats.click_counts[0].id.button_id, "alpha");
    assert_eq!(stats.click_counts[0].count, 3);
    let counts: Vec<u64> = stats.click_counts.iter().map(|g| g.count).collect();
    let mut sorted = counts.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted);
}

#[tokio::test]
async fn test_stats_button_filter() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    for _ in 0..4 {
        service
            .record_click(make_request("target", "Target", "s1"), None)
            .await
            .unwrap();
    }
    service
        .record_click(make_request("other", "Other", "s1"), None)
        .await
        .unwrap();

    let stats = service.get_stats(Some("target"), 100, 0).await.unwrap();

    assert_eq!(stats.total_count, 4);
    assert_eq!(stats.click_counts.len(), 1);
    assert_eq!(stats.click_counts[0].id.button_id, "target");
    assert!(stats.recent_clicks.iter().all(|c| c.button_id == "target"));
}

#[tokio::test]
async fn test_stats_recent_clicks_newest_first() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let now = Utc::now();
    insert_at(&storage, "old", now - Duration::hours(3)).await;
    insert_at(&storage, "mid", now - Duration::hours(2)).await;
    insert_at(&storage, "new", now - Duration::hours(1)).await;

    let stats = service.get_stats(None, 100, 0).await.unwrap();

    let ids: Vec<&str> = stats
        .recent_clicks
        .iter()
        .map(|c| c.button_id.as_str())
        .collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn test_stats_hourly_window_excludes_old_events() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let now = Utc::now();
    insert_at(&storage, "btn", now - Duration::hours(1)).await;
    insert_at(&storage, "btn", now - Duration::hours(2)).await;
    // 窗口外（> 24h）
    insert_at(&storage, "btn", now - Duration::hours(48)).await;

    let stats = service.get_stats(None, 100, 0).await.unwrap();

    let bucket_sum: u64 = stats.hourly_stats.iter().map(|b| b.count).sum();
    assert_eq!(bucket_sum, 2);
    assert_eq!(stats.total_count, 3);

    // date 降序、同日内 hour 降序
    let keys: Vec<(String, u32)> = stats
        .hourly_stats
        .iter()
        .map(|b| (b.id.date.clone(), b.id.hour))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(keys, sorted);
}

// =============================================================================
// export 测试
// =============================================================================

#[tokio::test]
async fn test_export_date_range_inclusive() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let base = Utc::now() - Duration::days(10);
    insert_at(&storage, "a", base).await;
    insert_at(&storage, "b", base + Duration::days(2)).await;
    insert_at(&storage, "c", base + Duration::days(4)).await;

    let start = base.to_rfc3339();
    let end = (base + Duration::days(2)).to_rfc3339();

    let events = service.export(Some(&start), Some(&end)).await.unwrap();

    // 边界两侧都包含
    assert_eq!(events.len(), 2);
    let ids: Vec<&str> = events.iter().map(|e| e.button_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test]
async fn test_export_unfiltered_newest_first() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    let now = Utc::now();
    insert_at(&storage, "first", now - Duration::minutes(30)).await;
    insert_at(&storage, "second", now - Duration::minutes(20)).await;
    insert_at(&storage, "third", now - Duration::minutes(10)).await;

    let events = service.export(None, None).await.unwrap();

    assert_eq!(events.len(), 3);
    let ids: Vec<&str> = events.iter().map(|e| e.button_id.as_str()).collect();
    assert_eq!(ids, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_export_invalid_dates_fall_back_to_open_range() {
    let (storage, _td) = create_temp_storage().await;
    let service = TrackingService::new(storage.clone());

    insert_at(&storage, "a", Utc::now()).await;

    let events = service
        .export(Some("not-a-date"), Some("also-bad"))
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
}

// =============================================================================
// 数据保留任务测试
// =============================================================================

#[tokio::test]
async fn test_retention_deletes_only_expired_events() {
    let (storage, _td) = create_temp_storage().await;

    let now = Utc::now();
    insert_at(&storage, "ancient", now - Duration::days(40)).await;
    insert_at(&storage, "old", now - Duration::days(31)).await;
    insert_at(&storage, "fresh", now - Duration::days(5)).await;

    let repo = storage.clone() as Arc<dyn ClickRepository>;
    let task = DataRetentionTask::new(repo.clone(), 30);

    let deleted = task.run_cleanup().await.unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(repo.count_clicks(None).await.unwrap(), 1);
    assert_eq!(repo.count_clicks(Some("fresh")).await.unwrap(), 1);
}

#[tokio::test]
async fn test_retention_disabled_deletes_nothing() {
    let (storage, _td) = create_temp_storage().await;

    insert_at(&storage, "ancient", Utc::now() - Duration::days(400)).await;

    let repo = storage.clone() as Arc<dyn ClickRepository>;
    let task = DataRetentionTask::new(repo.clone(), 0);

    let deleted = task.run_cleanup().await.unwrap();

    assert_eq!(deleted, 0);
    assert_eq!(repo.count_clicks(None).await.unwrap(), 1);
}
