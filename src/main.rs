use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use anyhow::Result;
use tracing::warn;

use clicktracker::api::routes::api_routes;
use clicktracker::api::services::health::health_check;
use clicktracker::config;
use clicktracker::services::{
    AuthService, DataRetentionTask, SubscriptionService, TrackingService,
};
use clicktracker::storage::{ClickRepository, StorageFactory};
use clicktracker::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::init_config();

    // 日志 guard 需要存活到进程结束
    let _log_guard = init_logging(config);

    let storage = StorageFactory::create().await?;

    let tracking_service = Arc::new(TrackingService::new(
        storage.clone() as Arc<dyn ClickRepository>
    ));
    let auth_service = Arc::new(AuthService::new(storage.clone()));
    let subscription_service = Arc::new(SubscriptionService::new(storage.clone()));

    // 数据保留任务（retention_days = 0 时不启动）
    let retention = Arc::new(DataRetentionTask::new(
        storage.clone() as Arc<dyn ClickRepository>,
        config.tracking.retention_days,
    ));
    retention.spawn_background_task(config.tracking.cleanup_interval_hours);

    let cpu_count = config.server.cpu_count.min(32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    let api_prefix = config.api.prefix.clone();
    let cors_origins = config.api.cors_allowed_origins.clone();

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);
        for origin in &cors_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .app_data(web::Data::new(tracking_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .wrap(cors)
            .service(api_routes(&api_prefix))
            .route("/health", web::get().to(health_check))
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count)
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
