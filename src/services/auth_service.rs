//! Auth service layer
//!
//! 用户注册与凭据校验。密码使用 Argon2id 哈希，
//! 用户存储在 users 表中（不是进程内 Map）。

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{ClickTrackerError, Result};
use crate::storage::SeaOrmStorage;
use crate::utils::password::{hash_password, verify_password};

use migration::entities::user;

/// 密码最小长度
const MIN_PASSWORD_LENGTH: usize = 6;

/// 注册请求
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// 对外暴露的用户信息（不含密码哈希）
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn model_to_user_info(model: user::Model) -> UserInfo {
    UserInfo {
        id: model.id,
        email: model.email,
        name: model.name,
        created_at: model.created_at,
    }
}

/// Auth 服务
pub struct AuthService {
    storage: Arc<SeaOrmStorage>,
}

impl AuthService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 注册新用户
    ///
    /// name 缺省时取 email 的本地部分。
    pub async fn register(&self, req: RegisterRequest) -> Result<UserInfo> {
        let email = req
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ClickTrackerError::validation("Email and password are required"))?;
        let password = req
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ClickTrackerError::validation("Email and password are required"))?;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ClickTrackerError::validation(
                "Password must be at least 6 characters",
            ));
        }

        if self.storage.find_user_by_email(&email).await?.is_some() {
            return Err(ClickTrackerError::validation("User already exists"));
        }

        let name = req
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or(&email).to_string());

        let password_hash = hash_password(&password)?;
        let id = uuid::Uuid::new_v4().to_string();

        let model = self
            .storage
            .insert_user(id, email, name, password_hash, Utc::now())
            .await?;

        info!("Auth: registered user '{}'", model.email);

        Ok(model_to_user_info(model))
    }

    /// 校验登录凭据
    ///
    /// 未知邮箱和密码错误返回同一个错误，不向调用方区分。
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<UserInfo> {
        let Some(model) = self.storage.find_user_by_email(email).await? else {
            return Err(ClickTrackerError::auth("Invalid email or password"));
        };

        if !verify_password(password, &model.password_hash)? {
            debug!("Auth: password mismatch for '{}'", email);
            return Err(ClickTrackerError::auth("Invalid email or password"));
        }

        Ok(model_to_user_info(model))
    }

    /// 按 id 取用户信息（token 校验后使用）
    pub async fn get_user(&self, id: &str) -> Result<Option<UserInfo>> {
        let model = self.storage.find_user_by_id(id).await?;
        Ok(model.map(model_to_user_info))
    }
}
