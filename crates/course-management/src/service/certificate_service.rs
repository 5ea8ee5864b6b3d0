//! 证书服务
//!
//! 证书签发与公开验证。证书编号形如 ADIMA-<年份>-<6 位大写字母数字>，
//! 签发时对编号碰撞做有限次重试；验证是只读操作，重复验证返回相同结果。

use std::sync::Arc;

use chrono::{Datelike, Utc};
use rand::Rng;
use serde_json::json;
use tracing::{info, instrument};

use crate::error::{CourseError, Result};
use crate::models::{Certificate, NewCertificate, event_types};
use crate::repository::{CertificateRepository, CourseRepository};
use crate::service::AnalyticsService;
use crate::service::dto::{CertificateView, IssueCertificateRequest};

/// 证书编号随机部分的字符表
const ID_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 编号碰撞时的最大重试次数
const ID_GENERATION_ATTEMPTS: usize = 3;

/// 证书服务
pub struct CertificateService {
    cert_repo: Arc<CertificateRepository>,
    course_repo: Arc<CourseRepository>,
    analytics: Arc<AnalyticsService>,
}

impl CertificateService {
    pub fn new(
        cert_repo: Arc<CertificateRepository>,
        course_repo: Arc<CourseRepository>,
        analytics: Arc<AnalyticsService>,
    ) -> Self {
        Self {
            cert_repo,
            course_repo,
            analytics,
        }
    }

    /// 验证证书
    ///
    /// 只读操作：不修改证书行，重复验证返回相同核心字段
    #[instrument(skip(self), fields(certificate_id = %certificate_id))]
    pub async fn verify(
        &self,
        certificate_id: &str,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<CertificateView> {
        let certificate_id = certificate_id.trim().to_uppercase();

        let certificate = self
            .cert_repo
            .find_by_certificate_id(&certificate_id)
            .await?
            .ok_or_else(|| CourseError::CertificateNotFound(certificate_id.clone()))?;

        if !certificate.is_valid {
            return Err(CourseError::CertificateInvalidated(certificate_id));
        }

        // 埋点失败不影响验证结果
        self.analytics
            .track_silently(
                event_types::CERTIFICATE_VERIFIED,
                &json!({
                    "certificateId": certificate.certificate_id,
                    "studentName": certificate.student_name,
                    "courseTitle": certificate.course_title,
                }),
                ip_address,
                user_agent,
            )
            .await;

        Ok(CertificateView {
            certificate_id: certificate.certificate_id,
            student_name: certificate.student_name,
            student_email: certificate.student_email,
            course_title: certificate.course_title,
            issue_date: certificate.issue_date,
            is_valid: certificate.is_valid,
        })
    }

    /// 签发证书（管理端）
    ///
    /// 课程标题在签发时快照，后续课程改名不影响已发证书；
    /// 校验失败时不落任何数据
    #[instrument(skip(self, request), fields(course_id = request.course_id))]
    pub async fn issue(&self, request: IssueCertificateRequest) -> Result<Certificate> {
        if request.student_name.trim().is_empty() || request.student_email.trim().is_empty() {
            return Err(CourseError::Validation(
                "All fields are required".to_string(),
            ));
        }

        let course = self
            .course_repo
            .get(request.course_id)
            .await?
            .ok_or(CourseError::CourseNotFound(request.course_id))?;

        let certificate_id = self.generate_unique_id().await?;

        let certificate = self
            .cert_repo
            .create(&NewCertificate {
                certificate_id: certificate_id.clone(),
                student_name: request.student_name,
                student_email: request.student_email,
                course_id: course.id,
                course_title: course.title,
                admin_id: request.admin_id,
            })
            .await?;

        info!(certificate_id = %certificate_id, course_id = course.id, "证书已签发");

        Ok(certificate)
    }

    /// 列出所有证书（管理端）
    pub async fn list(&self) -> Result<Vec<Certificate>> {
        self.cert_repo.list().await
    }

    /// 生成未被占用的证书编号，有限次重试
    ///
    /// 编号空间足够大，碰撞近乎不可能；重试只是兜底，
    /// 耗尽重试说明随机源异常，直接报内部错误
    async fn generate_unique_id(&self) -> Result<String> {
        for _ in 0..ID_GENERATION_ATTEMPTS {
            let id = generate_certificate_id();
            if !self.cert_repo.certificate_id_exists(&id).await? {
                return Ok(id);
            }
        }

        Err(CourseError::Internal(
            "certificate id generation kept colliding".to_string(),
        ))
    }
}

/// 生成证书编号：ADIMA-<当前年份>-<6 位大写字母数字>
pub fn generate_certificate_id() -> String {
    let year = Utc::now().year();
    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| ID_CHARS[rng.random_range(0..ID_CHARS.len())] as char)
        .collect();
    format!("ADIMA-{}-{}", year, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_id_format() {
        let year = Utc::now().year().to_string();
        for _ in 0..100 {
            let id = generate_certificate_id();
            let parts: Vec<&str> = id.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], "ADIMA");
            assert_eq!(parts[1], year);
            assert_eq!(parts[2].len(), 6);
            assert!(
                parts[2]
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn test_certificate_ids_vary() {
        let a = generate_certificate_id();
        let b = generate_certificate_id();
        let c = generate_certificate_id();
        assert!(a != b || b != c);
    }
}
