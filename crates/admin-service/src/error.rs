//! 管理后台错误类型定义
//!
//! 所有错误响应体统一为 `{"message": "..."}`，message 文案与状态码
//! 都是前端依赖的 API 契约。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use course_management::error::CourseError;

/// 管理后台错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 认证错误
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,

    // 验证错误（message 即请求缺陷的具体文案）
    #[error("{0}")]
    Validation(String),

    // 领域错误：状态码由 CourseError 的分类决定
    #[error(transparent)]
    Domain(#[from] CourseError),

    // 系统错误
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            Self::Validation(_) => StatusCode::BAD_REQUEST,

            Self::Domain(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Domain(e) if e.is_state_error() => StatusCode::BAD_REQUEST,
            Self::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,

            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "请求处理失败");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, axum::Json(json!({ "message": message }))).into_response()
    }
}

/// 从 validator 错误转换
///
/// 取第一条字段级错误的自定义文案作为 message，
/// 请求 DTO 上的 message 属性因此直接成为响应文案
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());

        Self::Validation(message)
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;
