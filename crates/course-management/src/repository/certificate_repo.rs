//! 证书仓储

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Certificate, NewCertificate};

/// 证书仓储
pub struct CertificateRepository {
    pool: PgPool,
}

impl CertificateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按证书编号精确查找
    pub async fn find_by_certificate_id(&self, certificate_id: &str) -> Result<Option<Certificate>> {
        let certificate = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT id, certificate_id, student_name, student_email, course_id,
                   course_title, issue_date, is_valid, admin_id, created_at
            FROM certificates
            WHERE certificate_id = $1
            "#,
        )
        .bind(certificate_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(certificate)
    }

    /// 证书编号是否已被占用
    pub async fn certificate_id_exists(&self, certificate_id: &str) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM certificates WHERE certificate_id = $1)",
        )
        .bind(certificate_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// 签发证书
    pub async fn create(&self, new: &NewCertificate) -> Result<Certificate> {
        let certificate = sqlx::query_as::<_, Certificate>(
            r#"
            INSERT INTO certificates (certificate_id, student_name, student_email,
                                      course_id, course_title, admin_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, certificate_id, student_name, student_email, course_id,
                      course_title, issue_date, is_valid, admin_id, created_at
            "#,
        )
        .bind(&new.certificate_id)
        .bind(&new.student_name)
        .bind(&new.student_email)
        .bind(new.course_id)
        .bind(&new.course_title)
        .bind(new.admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(certificate)
    }

    /// 列出所有证书（新签发在前）
    pub async fn list(&self) -> Result<Vec<Certificate>> {
        let certificates = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT id, certificate_id, student_name, student_email, course_id,
                   course_title, issue_date, is_valid, admin_id, created_at
            FROM certificates
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(certificates)
    }
}
