//! Subscription service layer
//!
//! 邮件订阅：创建、计数、列表。email 统一小写并去除首尾空白。

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::errors::{ClickTrackerError, Result};
use crate::storage::SeaOrmStorage;

use migration::entities::subscription;

/// 订阅结果
#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
    /// 新建订阅
    Created(subscription::Model),
    /// email 已存在，携带原订阅记录
    AlreadySubscribed(subscription::Model),
}

/// 订阅服务
pub struct SubscriptionService {
    storage: Arc<SeaOrmStorage>,
}

impl SubscriptionService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 订阅邮件列表
    pub async fn subscribe(&self, email: Option<String>) -> Result<SubscribeOutcome> {
        let email = email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ClickTrackerError::validation("Email is required"))?;

        if !is_valid_email(&email) {
            return Err(ClickTrackerError::validation("Invalid email format"));
        }

        if let Some(existing) = self.storage.find_subscription_by_email(&email).await? {
            return Ok(SubscribeOutcome::AlreadySubscribed(existing));
        }

        let model = self.storage.insert_subscription(email, Utc::now()).await?;

        info!("Subscribe: new subscription '{}'", model.email);

        Ok(SubscribeOutcome::Created(model))
    }

    /// 订阅总数
    pub async fn count(&self) -> Result<u64> {
        self.storage.count_subscriptions().await
    }

    /// 全部订阅，按订阅时间倒序
    pub async fn list(&self) -> Result<Vec<subscription::Model>> {
        self.storage.list_subscriptions().await
    }
}

/// 宽松的 email 形态检查：local@domain.tld，无空白字符
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@@example.com"));
    }
}
