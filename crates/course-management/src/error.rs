//! 课程管理服务错误类型定义
//!
//! Display 文案即对外 API 的 message 字段，是接口契约的一部分，
//! 变体携带的上下文仅用于日志排查（通过 Debug 输出）。

use thiserror::Error;

/// 课程管理服务错误类型
#[derive(Debug, Error)]
pub enum CourseError {
    // ==================== 数据库错误 ====================
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // ==================== 优惠码状态错误 ====================
    #[error("Invalid coupon code")]
    CouponNotFound(String),

    #[error("This coupon is no longer active")]
    CouponInactive(String),

    #[error("This coupon has expired")]
    CouponExpired(String),

    #[error("This coupon has reached its maximum usage limit")]
    CouponExhausted(String),

    #[error("You have already used this coupon")]
    CouponAlreadyUsed { code: String, student_email: String },

    // ==================== 证书错误 ====================
    #[error("Certificate not found")]
    CertificateNotFound(String),

    #[error("This certificate has been invalidated")]
    CertificateInvalidated(String),

    // ==================== 资源不存在 ====================
    #[error("Course not found")]
    CourseNotFound(i64),

    // ==================== 验证错误 ====================
    #[error("{0}")]
    Validation(String),

    // ==================== 通用错误 ====================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CourseError {
    /// 是否为"资源不存在"类错误（对外映射为 404）
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CouponNotFound(_) | Self::CertificateNotFound(_) | Self::CourseNotFound(_)
        )
    }

    /// 是否为状态/验证类错误（对外映射为 400）
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::CouponInactive(_)
                | Self::CouponExpired(_)
                | Self::CouponExhausted(_)
                | Self::CouponAlreadyUsed { .. }
                | Self::CertificateInvalidated(_)
                | Self::Validation(_)
        )
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, CourseError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Display 输出是 API 契约的一部分，客户端依赖这些文案做展示，
    /// 任何改动都是破坏性变更，必须逐一锁定。
    #[test]
    fn test_wire_messages_are_stable() {
        let cases: Vec<(CourseError, &str)> = vec![
            (
                CourseError::CouponNotFound("ADIMA-X".into()),
                "Invalid coupon code",
            ),
            (
                CourseError::CouponInactive("ADIMA-X".into()),
                "This coupon is no longer active",
            ),
            (
                CourseError::CouponExpired("ADIMA-X".into()),
                "This coupon has expired",
            ),
            (
                CourseError::CouponExhausted("ADIMA-X".into()),
                "This coupon has reached its maximum usage limit",
            ),
            (
                CourseError::CouponAlreadyUsed {
                    code: "ADIMA-X".into(),
                    student_email: "a@b.com".into(),
                },
                "You have already used this coupon",
            ),
            (
                CourseError::CertificateNotFound("ADIMA-2024-ABC123".into()),
                "Certificate not found",
            ),
            (
                CourseError::CertificateInvalidated("ADIMA-2024-ABC123".into()),
                "This certificate has been invalidated",
            ),
            (CourseError::CourseNotFound(42), "Course not found"),
            (
                CourseError::Validation("All fields are required".into()),
                "All fields are required",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected, "variant={:?}", error);
        }
    }

    #[test]
    fn test_not_found_classification() {
        assert!(CourseError::CouponNotFound("X".into()).is_not_found());
        assert!(CourseError::CertificateNotFound("X".into()).is_not_found());
        assert!(CourseError::CourseNotFound(1).is_not_found());
        assert!(!CourseError::CouponExpired("X".into()).is_not_found());
    }

    #[test]
    fn test_state_error_classification() {
        assert!(CourseError::CouponInactive("X".into()).is_state_error());
        assert!(CourseError::CouponExhausted("X".into()).is_state_error());
        assert!(CourseError::CertificateInvalidated("X".into()).is_state_error());
        assert!(!CourseError::CouponNotFound("X".into()).is_state_error());
        assert!(!CourseError::Internal("x".into()).is_state_error());
    }

    #[test]
    fn test_from_sqlx_error() {
        let err = CourseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, CourseError::Database(_)));
        assert!(!err.is_not_found());
        assert!(!err.is_state_error());
    }
}
