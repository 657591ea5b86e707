//! Subscribe API 端点
//!
//! - POST /subscribe：订阅
//! - GET  /subscribe/count：订阅数
//! - GET  /subscribe：订阅列表

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::errors::ClickTrackerError;
use crate::services::{SubscribeOutcome, SubscriptionService};

use super::helpers::{error_from_tracker, error_response};

/// 订阅请求
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub email: Option<String>,
}

/// 订阅列表条目
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionItem {
    pub id: i64,
    pub email: String,
    pub subscribed_at: chrono::DateTime<chrono::Utc>,
}

/// POST /subscribe - 订阅邮件列表
pub async fn subscribe(
    body: web::Json<SubscribeRequest>,
    service: web::Data<Arc<SubscriptionService>>,
) -> ActixResult<HttpResponse> {
    match service.subscribe(body.into_inner().email).await {
        Ok(SubscribeOutcome::Created(model)) => Ok(HttpResponse::Created().json(json!({
            "message": "Successfully subscribed",
            "email": model.email,
            "subscribedAt": model.subscribed_at,
        }))),
        Ok(SubscribeOutcome::AlreadySubscribed(existing)) => {
            Ok(HttpResponse::Conflict().json(json!({
                "error": "Email is already subscribed",
                "subscribedAt": existing.subscribed_at,
            })))
        }
        Err(err @ ClickTrackerError::Validation(_)) => Ok(error_from_tracker(&err)),
        Err(err) => {
            error!("Subscribe error: {}", err);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to subscribe. Please try again.",
            ))
        }
    }
}

/// GET /subscribe/count - 订阅数
pub async fn subscriber_count(
    service: web::Data<Arc<SubscriptionService>>,
) -> ActixResult<HttpResponse> {
    match service.count().await {
        Ok(count) => Ok(HttpResponse::Ok().json(json!({ "count": count }))),
        Err(err) => {
            error!("Get subscriber count error: {}", err);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve subscriber count",
            ))
        }
    }
}

/// GET /subscribe - 订阅列表（按订阅时间倒序）
pub async fn list_subscriptions(
    service: web::Data<Arc<SubscriptionService>>,
) -> ActixResult<HttpResponse> {
    match service.list().await {
        Ok(models) => {
            let subscriptions: Vec<SubscriptionItem> = models
                .into_iter()
                .map(|m| SubscriptionItem {
                    id: m.id,
                    email: m.email,
                    subscribed_at: m.subscribed_at,
                })
                .collect();

            Ok(HttpResponse::Ok().json(json!({
                "count": subscriptions.len(),
                "subscriptions": subscriptions,
            })))
        }
        Err(err) => {
            error!("Get subscriptions error: {}", err);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve subscriptions",
            ))
        }
    }
}
