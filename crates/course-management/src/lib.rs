//! 课程管理服务
//!
//! 提供在线课程平台的核心领域逻辑。
//!
//! ## 核心功能
//!
//! - **优惠码兑换**：校验优惠码状态（启用、有效期、使用上限、重复使用），
//!   在单个事务内记录使用并递增计数，返回课程资料
//! - **证书管理**：签发证书（课程标题快照）、按证书编号公开验证
//! - **事件埋点**：追加式分析事件日志（下载、兑换、验证、联系表单）
//! - **课程目录**：课程与课程资料的数据访问
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{CourseError, Result};
pub use models::*;
pub use repository::{
    AnalyticsRepository, CertificateRepository, CouponRepository, CourseRepository,
};
pub use service::{AnalyticsService, CertificateService, RedemptionService, dto};
