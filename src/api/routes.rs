//! API 路由配置
//!
//! 按功能模块拆分路由，提高可读性和可维护性。

use actix_web::web;

use crate::api::middleware::BearerAuth;
use crate::api::services::auth::{login, login_rate_limiter, me, register};
use crate::api::services::subscribe::{list_subscriptions, subscribe, subscriber_count};
use crate::api::services::tracking::{
    export_tracking_data, get_tracking_stats, track_button_click,
};

/// 点击统计路由 `/tracking`
///
/// 包含：
/// - POST /tracking/button-click - 摄入点击事件
/// - GET  /tracking/stats - 统计查询
/// - GET  /tracking/export - 导出（需要 Bearer token）
pub fn tracking_routes() -> actix_web::Scope {
    web::scope("/tracking")
        .route("/button-click", web::post().to(track_button_click))
        .route("/stats", web::get().to(get_tracking_stats))
        .service(
            web::resource("/export")
                .wrap(BearerAuth)
                .route(web::get().to(export_tracking_data)),
        )
}

/// 认证路由 `/auth`
///
/// 包含：
/// - POST /auth/register - 注册
/// - POST /auth/login - 登录（带限流）
/// - GET  /auth/me - 当前用户（需要 Bearer token）
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/register", web::post().to(register))
        .service(
            web::resource("/login")
                .wrap(login_rate_limiter())
                .route(web::post().to(login)),
        )
        .service(
            web::resource("/me")
                .wrap(BearerAuth)
                .route(web::get().to(me)),
        )
}

/// 订阅路由 `/subscribe`
///
/// 包含：
/// - POST /subscribe - 订阅
/// - GET  /subscribe/count - 订阅数
/// - GET  /subscribe - 订阅列表
pub fn subscribe_routes() -> actix_web::Scope {
    web::scope("/subscribe")
        .route("/count", web::get().to(subscriber_count))
        .route("", web::post().to(subscribe))
        .route("", web::get().to(list_subscriptions))
}

/// API 路由总装（挂在配置的 api prefix 下）
pub fn api_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        .service(tracking_routes())
        .service(auth_routes())
        .service(subscribe_routes())
}
