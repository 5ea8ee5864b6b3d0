//! 联系表单处理器
//!
//! 表单提交以 contact_form_submission 事件落入分析日志，
//! 暂不设独立的联系记录表

use axum::{Json, extract::State, http::HeaderMap};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use course_management::models::event_types;

use crate::error::Result;
use crate::handlers::client_meta;
use crate::state::AppState;

/// 联系表单请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmitRequest {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "All fields are required"),
        email(message = "Invalid email format")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub category: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub message: String,
}

/// 提交联系表单（公开接口）
///
/// POST /api/contact/submit
pub async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ContactSubmitRequest>,
) -> Result<Json<Value>> {
    req.validate()?;

    let (ip_address, user_agent) = client_meta(&headers);

    state
        .analytics_service
        .track(
            event_types::CONTACT_FORM_SUBMISSION,
            &json!({
                "name": req.name,
                "email": req.email,
                "subject": req.subject,
                "category": req.category,
                "message": req.message,
                "timestamp": Utc::now().to_rfc3339(),
            }),
            &ip_address,
            &user_agent,
        )
        .await?;

    Ok(Json(json!({ "message": "Contact form submitted successfully" })))
}
