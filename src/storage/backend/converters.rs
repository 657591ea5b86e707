//! 实体模型与领域模型的转换

use sea_orm::Set;
use std::collections::BTreeMap;

use migration::entities::click_event;

use crate::storage::models::{ClickEvent, ClickMetadata, NewClickEvent};

/// 从类型化列 + extra JSON 列还原元数据
pub fn metadata_from_columns(
    variant: Option<String>,
    size: Option<String>,
    page: Option<String>,
    user_agent: String,
    extra: Option<serde_json::Value>,
) -> ClickMetadata {
    let extra_map: BTreeMap<String, serde_json::Value> = match extra {
        Some(serde_json::Value::Object(map)) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    };

    ClickMetadata {
        variant,
        size,
        page,
        user_agent: Some(user_agent),
        extra: extra_map,
    }
}

/// 实体模型 → 领域模型
pub fn model_to_click_event(model: click_event::Model) -> ClickEvent {
    let metadata = metadata_from_columns(
        model.variant,
        model.size,
        model.page,
        model.user_agent,
        model.extra,
    );

    ClickEvent {
        id: model.id,
        button_id: model.button_id,
        button_text: model.button_text,
        user_id: model.user_id,
        session_id: model.session_id,
        timestamp: model.clicked_at,
        metadata,
    }
}

/// 待插入事件 → ActiveModel
///
/// extra 为空时写 NULL，避免存一堆空对象。
pub fn new_event_to_active_model(event: NewClickEvent) -> click_event::ActiveModel {
    let extra = if event.metadata.extra.is_empty() {
        None
    } else {
        Some(serde_json::Value::Object(
            event.metadata.extra.into_iter().collect(),
        ))
    };

    click_event::ActiveModel {
        button_id: Set(event.button_id),
        button_text: Set(event.button_text),
        user_id: Set(event.user_id),
        session_id: Set(event.session_id),
        clicked_at: Set(event.clicked_at),
        variant: Set(event.metadata.variant),
        size: Set(event.metadata.size),
        page: Set(event.metadata.page),
        user_agent: Set(event
            .metadata
            .user_agent
            .unwrap_or_else(|| "Unknown".to_string())),
        extra: Set(extra),
        ..Default::default()
    }
}
