//! 课程处理器（管理端）

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use course_management::models::NewCourse;

use crate::auth::Claims;
use crate::error::Result;
use crate::state::AppState;

/// 创建课程请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseBody {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub title: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub description: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub category: String,
    #[validate(range(min = 0.01, message = "All fields are required"))]
    pub price: f64,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub duration: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub level: String,
}

/// 列出所有课程（附优惠码/证书计数）
///
/// GET /api/admin/courses
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Value>> {
    let courses = state.course_repo.list_with_counts().await?;

    Ok(Json(json!({ "courses": courses })))
}

/// 创建课程
///
/// POST /api/admin/courses
pub async fn create_course(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCourseBody>,
) -> Result<Json<Value>> {
    req.validate()?;

    let course = state
        .course_repo
        .create(&NewCourse {
            title: req.title,
            description: req.description,
            category: req.category,
            price: req.price,
            duration: req.duration,
            level: req.level,
            admin_id: claims.admin_id()?,
        })
        .await?;

    Ok(Json(json!({
        "message": "Course created successfully",
        "course": course,
    })))
}
