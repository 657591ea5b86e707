use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::{ClickCountRow, HourlyBucketRow, RecentClickRow, SeaOrmStorage};
pub use models::{ClickEvent, ClickMetadata, NewClickEvent};

/// 点击事件持久化接口
///
/// 统计核心只依赖这个 trait，不绑定具体存储实现。
#[async_trait::async_trait]
pub trait ClickRepository: Send + Sync {
    /// 插入一条点击事件，返回带存储层分配 id 的完整记录
    async fn insert_click(&self, event: NewClickEvent) -> Result<ClickEvent>;

    /// 统计匹配过滤条件的事件总数
    async fn count_clicks(&self, button_id: Option<&str>) -> Result<u64>;

    /// 按时间倒序返回最近事件（分页 + 字段投影）
    async fn recent_clicks(
        &self,
        button_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RecentClickRow>>;

    /// 按 (button_id, button_text) 分组统计，按 count 降序
    async fn click_counts(&self, button_id: Option<&str>) -> Result<Vec<ClickCountRow>>;

    /// 按 (date, hour) 分组统计 since 之后的事件，按 date/hour 降序
    async fn hourly_stats(
        &self,
        button_id: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<Vec<HourlyBucketRow>>;

    /// 导出时间范围内的全部事件，按时间倒序（无分页）
    async fn export_clicks(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<ClickEvent>>;

    /// 删除 cutoff 之前的一批事件，返回删除数量（数据保留任务用）
    async fn delete_clicks_before(&self, cutoff: DateTime<Utc>, batch_size: u64) -> Result<u64>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = backend::SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
