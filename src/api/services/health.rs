//! Health check 端点

use actix_web::{HttpResponse, Result as ActixResult};
use serde_json::json;

/// GET /health - 健康检查
pub async fn health_check() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "Backend is running",
    })))
}
