//! 课程平台领域模型
//!
//! 包含课程、优惠码、证书与分析事件的核心实体定义

pub mod analytics;
pub mod certificate;
pub mod coupon;
pub mod course;

// 重新导出常用类型
pub use analytics::{AnalyticsEvent, NewAnalyticsEvent, event_types};
pub use certificate::{Certificate, NewCertificate};
pub use coupon::{Coupon, CouponUsage, NewCoupon, NewCouponUsage};
pub use course::{Course, CourseMaterial, MaterialType, NewCourse, NewCourseMaterial};
