//! 服务层数据传输对象
//!
//! 字段命名（camelCase、材料的 type/order 等）是对外 API 契约的一部分，
//! 序列化形状必须保持稳定。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{CouponUsage, MaterialType};
use crate::repository::PopularCourseRow;

/// 兑换请求
#[derive(Debug, Clone)]
pub struct RedeemCouponRequest {
    pub code: String,
    pub student_name: String,
    pub student_email: String,
    pub ip_address: String,
    pub user_agent: String,
}

/// 课程资料视图（兑换成功后返回）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialView {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    pub url: String,
    pub description: Option<String>,
    pub order: i32,
}

/// 课程访问视图
///
/// webinars 目前恒为空数组，为后续直播课功能预留的占位字段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAccessView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub duration: String,
    pub materials: Vec<MaterialView>,
    pub webinars: Vec<Value>,
}

/// 优惠码摘要（兑换成功后返回，currentUses 为本次递增后的值）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSummary {
    pub code: String,
    pub max_uses: i32,
    pub current_uses: i32,
}

/// 兑换结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemOutcome {
    pub course: CourseAccessView,
    pub coupon: CouponSummary,
}

/// 课程引用（管理端列表内嵌）
#[derive(Debug, Clone, Serialize)]
pub struct CourseRef {
    pub id: i64,
    pub title: String,
}

/// 管理端优惠码视图
///
/// 除优惠码本身的字段外，内嵌所属课程与完整使用记录列表
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponAdminView {
    pub id: i64,
    pub code: String,
    pub token: String,
    pub course_id: i64,
    pub course: CourseRef,
    pub max_uses: i32,
    pub current_uses: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub extended_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub usages: Vec<CouponUsage>,
    pub usage_count: i64,
}

/// 创建优惠码请求（管理端）
#[derive(Debug, Clone)]
pub struct CreateCouponRequest {
    pub course_id: i64,
    pub max_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub admin_id: i64,
}

/// 签发证书请求（管理端）
#[derive(Debug, Clone)]
pub struct IssueCertificateRequest {
    pub student_name: String,
    pub student_email: String,
    pub course_id: i64,
    pub admin_id: i64,
}

/// 证书验证视图
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub certificate_id: String,
    pub student_name: String,
    pub student_email: String,
    pub course_title: String,
    pub issue_date: DateTime<Utc>,
    pub is_valid: bool,
}

/// 管理看板汇总
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_downloads: i64,
    pub monthly_downloads: i64,
    pub coupon_redemptions: i64,
    pub certificate_verifications: i64,
    pub active_students: i64,
    pub popular_courses: Vec<PopularCourseRow>,
}
