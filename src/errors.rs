use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum ClickTrackerError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    Auth(String),
    NotFound(String),
    Conflict(String),
    Serialization(String),
    DateParse(String),
    PasswordHash(String),
}

impl ClickTrackerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ClickTrackerError::DatabaseConfig(_) => "E001",
            ClickTrackerError::DatabaseConnection(_) => "E002",
            ClickTrackerError::DatabaseOperation(_) => "E003",
            ClickTrackerError::Validation(_) => "E004",
            ClickTrackerError::Auth(_) => "E005",
            ClickTrackerError::NotFound(_) => "E006",
            ClickTrackerError::Conflict(_) => "E007",
            ClickTrackerError::Serialization(_) => "E008",
            ClickTrackerError::DateParse(_) => "E009",
            ClickTrackerError::PasswordHash(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ClickTrackerError::DatabaseConfig(_) => "Database Configuration Error",
            ClickTrackerError::DatabaseConnection(_) => "Database Connection Error",
            ClickTrackerError::DatabaseOperation(_) => "Database Operation Error",
            ClickTrackerError::Validation(_) => "Validation Error",
            ClickTrackerError::Auth(_) => "Authentication Error",
            ClickTrackerError::NotFound(_) => "Resource Not Found",
            ClickTrackerError::Conflict(_) => "Conflict",
            ClickTrackerError::Serialization(_) => "Serialization Error",
            ClickTrackerError::DateParse(_) => "Date Parse Error",
            ClickTrackerError::PasswordHash(_) => "Password Hash Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ClickTrackerError::DatabaseConfig(msg) => msg,
            ClickTrackerError::DatabaseConnection(msg) => msg,
            ClickTrackerError::DatabaseOperation(msg) => msg,
            ClickTrackerError::Validation(msg) => msg,
            ClickTrackerError::Auth(msg) => msg,
            ClickTrackerError::NotFound(msg) => msg,
            ClickTrackerError::Conflict(msg) => msg,
            ClickTrackerError::Serialization(msg) => msg,
            ClickTrackerError::DateParse(msg) => msg,
            ClickTrackerError::PasswordHash(msg) => msg,
        }
    }

    /// 错误类别到 HTTP 状态码的映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            ClickTrackerError::Validation(_) | ClickTrackerError::DateParse(_) => {
                StatusCode::BAD_REQUEST
            }
            ClickTrackerError::Auth(_) => StatusCode::UNAUTHORIZED,
            ClickTrackerError::NotFound(_) => StatusCode::NOT_FOUND,
            ClickTrackerError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ClickTrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ClickTrackerError {}

// 便捷的构造函数
impl ClickTrackerError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::Validation(msg.into())
    }

    pub fn auth<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::Auth(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::DateParse(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        ClickTrackerError::PasswordHash(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ClickTrackerError {
    fn from(err: sea_orm::DbErr) -> Self {
        ClickTrackerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ClickTrackerError {
    fn from(err: std::io::Error) -> Self {
        ClickTrackerError::DatabaseConfig(err.to_string())
    }
}

impl From<serde_json::Error> for ClickTrackerError {
    fn from(err: serde_json::Error) -> Self {
        ClickTrackerError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ClickTrackerError {
    fn from(err: chrono::ParseError) -> Self {
        ClickTrackerError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ClickTrackerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ClickTrackerError::Auth(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for ClickTrackerError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        ClickTrackerError::PasswordHash(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClickTrackerError>;
