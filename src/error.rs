//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 用户名或邮箱已被占用
    #[error("Duplicate credential: {0}")]
    DuplicateCredential(String),

    #[error("Resource not found")]
    NotFound,

    /// 密码不匹配
    #[error("Invalid credential")]
    InvalidCredential,

    /// 请求未携带令牌
    #[error("Missing token")]
    MissingToken,

    /// 签名错误、已过期或格式错误的令牌（对外不区分）
    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateCredential(_) => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidCredential | AppError::MissingToken | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::DuplicateCredential(msg) => msg.clone(),
            AppError::NotFound => "Resource not found".to_string(),
            AppError::InvalidCredential => "Invalid username or password".to_string(),
            AppError::MissingToken => "No token, authorization denied".to_string(),
            AppError::InvalidToken => "Token is not valid".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::BadRequest(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    /// 服务端故障（需要记录详细日志）
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// 将唯一约束冲突映射为 DuplicateCredential，其余数据库错误原样返回
    pub fn from_unique_violation(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let message = match db_err.constraint() {
                    Some(c) if c.contains("email") => "Email already registered",
                    _ => "Username already taken",
                };
                return AppError::DuplicateCredential(message.to_string());
            }
        }
        AppError::Database(err)
    }
}

/// 错误响应 DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        } else {
            tracing::debug!(code = self.code(), "Request rejected");
        }

        let body = ErrorResponse {
            message: self.user_message(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// 请求体无法解析为 JSON 时返回统一的错误格式
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::DuplicateCredential("x".to_string()).code(), 409);
        assert_eq!(AppError::NotFound.code(), 404);
        assert_eq!(AppError::InvalidCredential.code(), 401);
        assert_eq!(AppError::MissingToken.code(), 401);
        assert_eq!(AppError::InvalidToken.code(), 401);
        assert_eq!(AppError::Forbidden.code(), 403);
        assert_eq!(AppError::BadRequest("test".to_string()).code(), 400);
        assert_eq!(AppError::Internal("boom".to_string()).code(), 500);
    }

    #[test]
    fn test_user_message_no_sensitive_info() {
        let error = AppError::Database(sqlx::Error::RowNotFound);
        let message = error.user_message();
        assert_eq!(message, "Database error occurred");
        assert!(!message.contains("sqlx"));

        let error = AppError::Internal("argon2 params rejected".to_string());
        assert_eq!(error.user_message(), "Internal server error");
    }

    #[test]
    fn test_only_server_errors_are_flagged() {
        assert!(AppError::Database(sqlx::Error::PoolTimedOut).is_server_error());
        assert!(!AppError::InvalidToken.is_server_error());
        assert!(!AppError::DuplicateCredential("x".to_string()).is_server_error());
    }

    #[test]
    fn test_non_database_error_passes_through_unique_mapping() {
        let err = AppError::from_unique_violation(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
    }
}
