//! 点击事件相关的数据库查询
//!
//! ClickRepository 的 SeaORM 实现，供 TrackingService 调用。
//! 分组/分桶查询使用按后端区分的日期格式化表达式。

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbBackend, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

use migration::entities::click_event;

use crate::errors::Result;
use crate::storage::models::{ClickEvent, NewClickEvent};
use crate::storage::{ClickRepository, SeaOrmStorage};

use super::converters::{model_to_click_event, new_event_to_active_model};

// ============ 查询结果类型 ============

/// 最近点击查询结果行（投影字段）
#[derive(Debug, Clone, FromQueryResult)]
pub struct RecentClickRow {
    pub button_id: String,
    pub button_text: String,
    pub clicked_at: DateTime<Utc>,
    pub variant: Option<String>,
    pub size: Option<String>,
}

/// 按钮分组统计结果行
#[derive(Debug, Clone, FromQueryResult)]
pub struct ClickCountRow {
    pub button_id: String,
    pub button_text: String,
    pub count: i64,
    pub last_clicked: DateTime<Utc>,
}

/// 小时分桶统计结果行
///
/// hour 以字符串返回（跨后端类型一致），由 service 层解析为数字。
#[derive(Debug, Clone, FromQueryResult)]
pub struct HourlyBucketRow {
    pub date: String,
    pub hour: String,
    pub count: i64,
}

// ============ 按后端区分的日期表达式 ============

fn db_backend(storage: &SeaOrmStorage) -> DbBackend {
    match storage.get_backend_name() {
        "sqlite" => DbBackend::Sqlite,
        "mysql" => DbBackend::MySql,
        _ => DbBackend::Postgres,
    }
}

/// 日期部分（YYYY-MM-DD）
fn date_expr(backend: DbBackend) -> Expr {
    match backend {
        DbBackend::Sqlite => Expr::cust("strftime('%Y-%m-%d', clicked_at)"),
        DbBackend::MySql => Expr::cust("DATE_FORMAT(clicked_at, '%Y-%m-%d')"),
        DbBackend::Postgres | _ => Expr::cust("TO_CHAR(clicked_at, 'YYYY-MM-DD')"),
    }
}

/// 小时部分（00-23，零填充文本）
fn hour_expr(backend: DbBackend) -> Expr {
    match backend {
        DbBackend::Sqlite => Expr::cust("strftime('%H', clicked_at)"),
        DbBackend::MySql => Expr::cust("DATE_FORMAT(clicked_at, '%H')"),
        DbBackend::Postgres | _ => Expr::cust("TO_CHAR(clicked_at, 'HH24')"),
    }
}

/// 可选的 button_id 过滤
fn apply_button_filter(
    query: sea_orm::Select<click_event::Entity>,
    button_id: Option<&str>,
) -> sea_orm::Select<click_event::Entity> {
    match button_id {
        Some(id) => query.filter(click_event::Column::ButtonId.eq(id)),
        None => query,
    }
}

// ============ ClickRepository 实现 ============

#[async_trait::async_trait]
impl ClickRepository for SeaOrmStorage {
    async fn insert_click(&self, event: NewClickEvent) -> Result<ClickEvent> {
        let active = new_event_to_active_model(event);
        let model = active.insert(self.get_db()).await?;
        Ok(model_to_click_event(model))
    }

    async fn count_clicks(&self, button_id: Option<&str>) -> Result<u64> {
        let count = apply_button_filter(click_event::Entity::find(), button_id)
            .count(self.get_db())
            .await?;
        Ok(count)
    }

    async fn recent_clicks(
        &self,
        button_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RecentClickRow>> {
        let rows = apply_button_filter(click_event::Entity::find(), button_id)
            .select_only()
            .column(click_event::Column::ButtonId)
            .column(click_event::Column::ButtonText)
            .column(click_event::Column::ClickedAt)
            .column(click_event::Column::Variant)
            .column(click_event::Column::Size)
            .order_by_desc(click_event::Column::ClickedAt)
            .offset(offset)
            .limit(limit)
            .into_model::<RecentClickRow>()
            .all(self.get_db())
            .await?;
        Ok(rows)
    }

    async fn click_counts(&self, button_id: Option<&str>) -> Result<Vec<ClickCountRow>> {
        let rows = apply_button_filter(click_event::Entity::find(), button_id)
            .select_only()
            .column(click_event::Column::ButtonId)
            .column(click_event::Column::ButtonText)
            .column_as(click_event::Column::Id.count(), "count")
            .column_as(click_event::Column::ClickedAt.max(), "last_clicked")
            .group_by(click_event::Column::ButtonId)
            .group_by(click_event::Column::ButtonText)
            .order_by_desc(Expr::cust("count"))
            .into_model::<ClickCountRow>()
            .all(self.get_db())
            .await?;
        Ok(rows)
    }

    async fn hourly_stats(
        &self,
        button_id: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<Vec<HourlyBucketRow>> {
        let backend = db_backend(self);
        let date = date_expr(backend);
        let hour = hour_expr(backend);

        let rows = apply_button_filter(click_event::Entity::find(), button_id)
            .select_only()
            .column_as(date.clone(), "date")
            .column_as(hour.clone(), "hour")
            .column_as(click_event::Column::Id.count(), "count")
            .filter(click_event::Column::ClickedAt.gte(since))
            .group_by(date)
            .group_by(hour)
            .order_by_desc(Expr::cust("date"))
            .order_by_desc(Expr::cust("hour"))
            .into_model::<HourlyBucketRow>()
            .all(self.get_db())
            .await?;
        Ok(rows)
    }

    async fn export_clicks(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<ClickEvent>> {
        let mut query = click_event::Entity::find();
        if let Some(start) = start {
            query = query.filter(click_event::Column::ClickedAt.gte(start));
        }
        if let Some(end) = end {
            query = query.filter(click_event::Column::ClickedAt.lte(end));
        }

        let models = query
            .order_by_desc(click_event::Column::ClickedAt)
            .all(self.get_db())
            .await?;

        Ok(models.into_iter().map(model_to_click_event).collect())
    }

    async fn delete_clicks_before(&self, cutoff: DateTime<Utc>, batch_size: u64) -> Result<u64> {
        let db = self.get_db();

        // 先查一批 ID 再删除，避免大范围 DELETE 长时间持锁
        let ids_to_delete: Vec<i64> = click_event::Entity::find()
            .select_only()
            .column(click_event::Column::Id)
            .filter(click_event::Column::ClickedAt.lt(cutoff))
            .order_by_asc(click_event::Column::Id)
            .limit(batch_size)
            .into_tuple()
            .all(db)
            .await?;

        if ids_to_delete.is_empty() {
            return Ok(0);
        }

        let deleted = click_event::Entity::delete_many()
            .filter(click_event::Column::Id.is_in(ids_to_delete))
            .exec(db)
            .await?
            .rows_affected;

        Ok(deleted)
    }
}
