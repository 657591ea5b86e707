//! 点击事件表迁移
//!
//! 创建 click_events 表用于存储 UI 交互事件，包括：
//! - 控件标识（button_id, button_text）
//! - 会话关联键（session_id）
//! - 元数据核心字段（variant, size, page, user_agent）
//! - 额外元数据（extra, JSON 透传）

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 click_events 表
        manager
            .create_table(
                Table::create()
                    .table(ClickEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClickEvents::ButtonId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClickEvents::ButtonText)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClickEvents::UserId).string_len(64).null())
                    .col(
                        ColumnDef::new(ClickEvents::SessionId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClickEvents::ClickedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClickEvents::Variant).string_len(64).null())
                    .col(ColumnDef::new(ClickEvents::Size).string_len(64).null())
                    .col(ColumnDef::new(ClickEvents::Page).string_len(255).null())
                    .col(
                        ColumnDef::new(ClickEvents::UserAgent)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClickEvents::Extra).json().null())
                    .to_owned(),
            )
            .await?;

        // 创建 clicked_at 索引（用于时间范围查询和最近事件排序）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_clicked_at")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::ClickedAt)
                    .to_owned(),
            )
            .await?;

        // 创建复合索引（用于单控件时间序列查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_button_time")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::ButtonId)
                    .col(ClickEvents::ClickedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除索引
        manager
            .drop_index(
                Index::drop()
                    .name("idx_click_events_button_time")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_click_events_clicked_at")
                    .to_owned(),
            )
            .await?;

        // 删除表
        manager
            .drop_table(Table::drop().table(ClickEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClickEvents {
    #[sea_orm(iden = "click_events")]
    Table,
    Id,
    ButtonId,
    ButtonText,
    UserId,
    SessionId,
    ClickedAt,
    Variant,
    Size,
    Page,
    UserAgent,
    Extra,
}
