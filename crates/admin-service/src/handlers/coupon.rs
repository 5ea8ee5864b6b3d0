//! 优惠码处理器
//!
//! 公开的兑换接口与管理端的优惠码 CRUD

use axum::{Extension, Json, extract::State, http::HeaderMap};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use course_management::service::dto::{CreateCouponRequest, RedeemCouponRequest};

use crate::auth::Claims;
use crate::error::{ApiError, Result};
use crate::handlers::client_meta;
use crate::state::AppState;

/// 兑换请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    #[validate(length(min = 1, message = "Coupon code, student name, and email are required"))]
    pub code: String,
    #[validate(length(min = 1, message = "Coupon code, student name, and email are required"))]
    pub student_name: String,
    #[validate(length(min = 1, message = "Coupon code, student name, and email are required"))]
    pub student_email: String,
}

/// 创建优惠码请求
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponBody {
    pub course_id: Option<i64>,
    pub max_uses: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// 兑换优惠码（公开接口）
///
/// POST /api/coupons/validate
pub async fn validate_coupon(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ValidateCouponRequest>,
) -> Result<Json<Value>> {
    req.validate()?;

    let (ip_address, user_agent) = client_meta(&headers);

    let outcome = state
        .redemption_service
        .redeem(RedeemCouponRequest {
            code: req.code,
            student_name: req.student_name,
            student_email: req.student_email,
            ip_address,
            user_agent,
        })
        .await?;

    Ok(Json(json!({
        "message": "Coupon validated successfully",
        "course": outcome.course,
        "coupon": outcome.coupon,
    })))
}

/// 列出所有优惠码（管理端）
///
/// GET /api/admin/coupons
pub async fn list_coupons(State(state): State<AppState>) -> Result<Json<Value>> {
    let coupons = state.redemption_service.list_coupons().await?;

    Ok(Json(json!({ "coupons": coupons })))
}

/// 创建优惠码（管理端）
///
/// POST /api/admin/coupons
pub async fn create_coupon(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCouponBody>,
) -> Result<Json<Value>> {
    let (course_id, max_uses) = match (req.course_id, req.max_uses) {
        (Some(course_id), Some(max_uses)) => (course_id, max_uses),
        _ => {
            return Err(ApiError::Validation(
                "Course ID and max uses are required".to_string(),
            ));
        }
    };

    let coupon = state
        .redemption_service
        .create_coupon(CreateCouponRequest {
            course_id,
            max_uses,
            expires_at: req.expires_at,
            admin_id: claims.admin_id()?,
        })
        .await?;

    Ok(Json(json!({
        "message": "Coupon created successfully",
        "coupon": coupon,
    })))
}
