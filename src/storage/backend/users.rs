//! 用户表查询

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use migration::entities::user;

use crate::errors::Result;
use crate::storage::SeaOrmStorage;

impl SeaOrmStorage {
    /// 插入新用户
    pub async fn insert_user(
        &self,
        id: String,
        email: String,
        name: String,
        password_hash: String,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<user::Model> {
        let active = user::ActiveModel {
            id: Set(id),
            email: Set(email),
            name: Set(name),
            password_hash: Set(password_hash),
            created_at: Set(created_at),
        };
        let model = active.insert(self.get_db()).await?;
        Ok(model)
    }

    /// 按 email 查找用户（登录、重复注册检查）
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.get_db())
            .await?;
        Ok(model)
    }

    /// 按 id 查找用户（token 校验后取用户信息）
    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<user::Model>> {
        let model = user::Entity::find_by_id(id).one(self.get_db()).await?;
        Ok(model)
    }
}
