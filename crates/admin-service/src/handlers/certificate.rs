//! 证书处理器
//!
//! 公开的证书验证接口与管理端的证书签发、列表

use axum::{Extension, Json, extract::State, http::HeaderMap};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use course_management::service::dto::IssueCertificateRequest;

use crate::auth::Claims;
use crate::error::Result;
use crate::handlers::client_meta;
use crate::state::AppState;

/// 证书验证请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCertificateRequest {
    #[validate(length(min = 1, message = "Certificate ID is required"))]
    pub certificate_id: String,
}

/// 签发证书请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IssueCertificateBody {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub student_name: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub student_email: String,
    pub course_id: i64,
}

/// 验证证书（公开接口）
///
/// POST /api/certificates/verify
pub async fn verify_certificate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<VerifyCertificateRequest>,
) -> Result<Json<Value>> {
    req.validate()?;

    let (ip_address, user_agent) = client_meta(&headers);

    let certificate = state
        .certificate_service
        .verify(&req.certificate_id, &ip_address, &user_agent)
        .await?;

    Ok(Json(json!({
        "message": "Certificate verified successfully",
        "certificate": certificate,
    })))
}

/// 列出所有证书（管理端）
///
/// GET /api/admin/certificates
pub async fn list_certificates(State(state): State<AppState>) -> Result<Json<Value>> {
    let certificates = state.certificate_service.list().await?;

    Ok(Json(json!({ "certificates": certificates })))
}

/// 签发证书（管理端）
///
/// POST /api/admin/certificates
pub async fn issue_certificate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<IssueCertificateBody>,
) -> Result<Json<Value>> {
    req.validate()?;

    let certificate = state
        .certificate_service
        .issue(IssueCertificateRequest {
            student_name: req.student_name,
            student_email: req.student_email,
            course_id: req.course_id,
            admin_id: claims.admin_id()?,
        })
        .await?;

    Ok(Json(json!({
        "message": "Certificate created successfully",
        "certificate": certificate,
    })))
}
