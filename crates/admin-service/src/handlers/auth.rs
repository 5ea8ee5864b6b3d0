//! 管理员登录处理器

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::FromRow;
use validator::Validate;

use crate::auth::verify_password;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

/// 返回给前端的管理员信息（不含密码哈希）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDto {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// 数据库管理员记录
#[derive(Debug, FromRow)]
struct AdminRow {
    id: i64,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
}

/// 管理员登录
///
/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>> {
    req.validate()?;

    // 未知邮箱和密码错误统一返回 Invalid credentials，不暴露账号是否存在
    let admin: AdminRow = sqlx::query_as(
        r#"
        SELECT id, email, password_hash, name, role, created_at
        FROM admins
        WHERE email = $1
        "#,
    )
    .bind(&req.email)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&req.password, &admin.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let (token, _expires_at) =
        state
            .jwt_manager
            .generate_token(admin.id, &admin.email, &admin.role)?;

    tracing::info!(admin_id = admin.id, email = %admin.email, "管理员登录成功");

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "admin": AdminDto {
            id: admin.id,
            email: admin.email,
            name: admin.name,
            role: admin.role,
            created_at: admin.created_at,
        },
    })))
}
