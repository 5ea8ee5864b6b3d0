//! 分析事件实体定义
//!
//! 追加式事件日志：只插入，从不更新或删除

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 事件类型标签
///
/// event_type 是自由字符串，这里集中定义系统内置的几种
pub mod event_types {
    pub const DOWNLOAD: &str = "download";
    pub const COUPON_USED: &str = "coupon_used";
    pub const CERTIFICATE_VERIFIED: &str = "certificate_verified";
    pub const CONTACT_FORM_SUBMISSION: &str = "contact_form_submission";
}

/// 分析事件
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: i64,
    pub event_type: String,
    /// 事件负载（不透明 JSON 字符串，刻意不做 schema 约束）
    pub event_data: String,
    pub ip_address: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

/// 新建分析事件
#[derive(Debug, Clone)]
pub struct NewAnalyticsEvent {
    pub event_type: String,
    pub event_data: String,
    pub ip_address: String,
    pub user_agent: String,
}
