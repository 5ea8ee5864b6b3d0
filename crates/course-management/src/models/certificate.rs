//! 证书实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 证书
///
/// 颁发给学员的结业凭证，可通过唯一的 certificate_id 公开验证。
/// course_title 是签发时的快照，课程后续改名不影响历史证书。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: i64,
    /// 对外证书编号（唯一，形如 ADIMA-2024-ABC123）
    pub certificate_id: String,
    pub student_name: String,
    pub student_email: String,
    pub course_id: i64,
    pub course_title: String,
    pub issue_date: DateTime<Utc>,
    pub is_valid: bool,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
}

/// 新建证书
#[derive(Debug, Clone)]
pub struct NewCertificate {
    pub certificate_id: String,
    pub student_name: String,
    pub student_email: String,
    pub course_id: i64,
    pub course_title: String,
    pub admin_id: i64,
}
