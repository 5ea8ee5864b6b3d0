//! 数据库仓储层
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 事务控制由调用方（服务层）决定，`*_in_tx` 方法在给定连接上执行

mod analytics_repo;
mod certificate_repo;
mod coupon_repo;
mod course_repo;

pub use analytics_repo::{AnalyticsRepository, PopularCourseRow};
pub use certificate_repo::CertificateRepository;
pub use coupon_repo::{CouponRepository, CouponWithCourse};
pub use course_repo::{CourseRepository, CourseWithCounts};
