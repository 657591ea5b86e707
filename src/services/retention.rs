//! 数据清理任务
//!
//! 按配置的保留天数分批删除过期点击事件，防止数据库无限增长。
//! retention_days 为 0 时完全关闭。

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{debug, error, info, warn};

use crate::storage::ClickRepository;

/// 每次删除批量大小
const BATCH_SIZE: u64 = 10000;

/// 防止无限循环的批次上限
const MAX_ITERATIONS: u32 = 1000;

/// 数据清理任务
pub struct DataRetentionTask {
    repo: Arc<dyn ClickRepository>,
    /// 点击事件保留天数
    retention_days: u64,
}

impl DataRetentionTask {
    pub fn new(repo: Arc<dyn ClickRepository>, retention_days: u64) -> Self {
        Self {
            repo,
            retention_days,
        }
    }

    /// 运行一轮清理，返回删除的事件总数
    pub async fn run_cleanup(&self) -> crate::errors::Result<u64> {
        if self.retention_days == 0 {
            return Ok(0);
        }

        let cutoff = Utc::now() - Duration::days(self.retention_days as i64);

        let mut total_deleted = 0u64;
        let mut iterations = 0u32;

        loop {
            if iterations >= MAX_ITERATIONS {
                warn!(
                    "Retention cleanup reached max iterations {} (deleted {} rows)",
                    MAX_ITERATIONS, total_deleted
                );
                break;
            }

            let deleted = self.repo.delete_clicks_before(cutoff, BATCH_SIZE).await?;
            if deleted == 0 {
                break;
            }

            total_deleted += deleted;
            iterations += 1;

            debug!(
                "Retention cleanup batch {}: deleted {} rows (total {})",
                iterations, deleted, total_deleted
            );

            if deleted < BATCH_SIZE {
                break;
            }

            // 批次间短暂暂停，降低对数据库的压力
            tokio::time::sleep(StdDuration::from_millis(100)).await;
        }

        if total_deleted > 0 {
            info!("Retention cleanup completed: {} events deleted", total_deleted);
        }

        Ok(total_deleted)
    }

    /// 启动后台清理任务
    ///
    /// 每隔指定时间运行一次清理，首次运行延迟 5 分钟。
    pub fn spawn_background_task(self: Arc<Self>, interval_hours: u64) {
        if self.retention_days == 0 {
            info!("Retention cleanup disabled (retention_days = 0)");
            return;
        }

        tokio::spawn(async move {
            let interval = StdDuration::from_secs(interval_hours * 60 * 60);

            tokio::time::sleep(StdDuration::from_secs(300)).await;

            loop {
                if let Err(e) = self.run_cleanup().await {
                    error!("Retention cleanup task failed: {}", e);
                }

                tokio::time::sleep(interval).await;
            }
        });

        info!(
            "Retention cleanup background task started (interval: {} hours)",
            interval_hours
        );
    }
}
