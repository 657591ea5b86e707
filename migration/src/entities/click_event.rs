//! Click event entity for UI interaction tracking

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "click_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub button_id: String,
    pub button_text: String,
    /// 预留字段：认证用户触发的点击（当前摄入路径不写入）
    pub user_id: Option<String>,
    pub session_id: String,
    pub clicked_at: DateTimeUtc,
    pub variant: Option<String>,
    pub size: Option<String>,
    pub page: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    /// 调用方自带的额外元数据键（JSON 透传，不做校验）
    #[sea_orm(column_type = "Json", nullable)]
    pub extra: Option<Json>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
