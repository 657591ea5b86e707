//! Auth API 端点
//!
//! - POST /auth/register：注册
//! - POST /auth/login：登录（带限流），返回 Bearer token
//! - GET  /auth/me：当前用户（需要 Bearer token）

use actix_governor::{Governor, GovernorConfigBuilder, PeerIpKeyExtractor};
use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::jwt::get_jwt_service;
use crate::api::middleware::AuthUser;
use crate::errors::ClickTrackerError;
use crate::services::{AuthService, RegisterRequest, UserInfo};

use super::helpers::{error_from_tracker, error_response};

/// 登录请求
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// 登录成功响应
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

/// 创建登录限流器
///
/// 按连接 IP 限流：每秒补充 1 个令牌，突发最多 5 次请求。
/// 超限返回 HTTP 429 Too Many Requests。
pub fn login_rate_limiter() -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

/// POST /auth/register - 注册新用户
pub async fn register(
    body: web::Json<RegisterRequest>,
    service: web::Data<Arc<AuthService>>,
) -> ActixResult<HttpResponse> {
    match service.register(body.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(json!({
            "message": "User registered successfully",
            "user": user,
        }))),
        Err(err @ ClickTrackerError::Validation(_)) => Ok(error_from_tracker(&err)),
        Err(err) => {
            error!("Register error: {}", err);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed",
            ))
        }
    }
}

/// POST /auth/login - 登录
pub async fn login(
    body: web::Json<LoginRequest>,
    service: web::Data<Arc<AuthService>>,
) -> ActixResult<HttpResponse> {
    let body = body.into_inner();
    let email = body.email.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    match service.verify_credentials(&email, &password).await {
        Ok(user) => {
            let token = match get_jwt_service().generate_access_token(&user.id, &user.email) {
                Ok(token) => token,
                Err(e) => {
                    error!("Token generation failed: {}", e);
                    return Ok(error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Login failed",
                    ));
                }
            };

            Ok(HttpResponse::Ok().json(LoginResponse {
                message: "Login successful".to_string(),
                token,
                user,
            }))
        }
        Err(err @ ClickTrackerError::Auth(_)) => Ok(error_from_tracker(&err)),
        Err(err) => {
            error!("Login error: {}", err);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Login failed",
            ))
        }
    }
}

/// GET /auth/me - 当前用户信息（BearerAuth 之后）
pub async fn me(
    req: HttpRequest,
    service: web::Data<Arc<AuthService>>,
) -> ActixResult<HttpResponse> {
    // 中间件保证 AuthUser 已写入 extensions
    let Some(auth_user) = req.extensions().get::<AuthUser>().cloned() else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            "Missing or invalid token",
        ));
    };

    match service.get_user(&auth_user.id).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(json!({ "user": user }))),
        Ok(None) => Ok(error_response(StatusCode::NOT_FOUND, "User not found")),
        Err(err) => {
            error!("Get current user error: {}", err);
            Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve user",
            ))
        }
    }
}
