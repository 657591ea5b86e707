//! 订阅表查询

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use migration::entities::subscription;

use crate::errors::Result;
use crate::storage::SeaOrmStorage;

impl SeaOrmStorage {
    /// 插入订阅记录
    pub async fn insert_subscription(
        &self,
        email: String,
        subscribed_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<subscription::Model> {
        let active = subscription::ActiveModel {
            email: Set(email),
            subscribed_at: Set(subscribed_at),
            ..Default::default()
        };
        let model = active.insert(self.get_db()).await?;
        Ok(model)
    }

    /// 按 email 查找订阅（重复订阅检查）
    pub async fn find_subscription_by_email(
        &self,
        email: &str,
    ) -> Result<Option<subscription::Model>> {
        let model = subscription::Entity::find()
            .filter(subscription::Column::Email.eq(email))
            .one(self.get_db())
            .await?;
        Ok(model)
    }

    /// 订阅总数
    pub async fn count_subscriptions(&self) -> Result<u64> {
        let count = subscription::Entity::find().count(self.get_db()).await?;
        Ok(count)
    }

    /// 全部订阅，按订阅时间倒序
    pub async fn list_subscriptions(&self) -> Result<Vec<subscription::Model>> {
        let models = subscription::Entity::find()
            .order_by_desc(subscription::Column::SubscribedAt)
            .all(self.get_db())
            .await?;
        Ok(models)
    }
}
