//! 服务层
//!
//! 实现课程平台的业务逻辑，协调仓储层并承担事务控制。
//!
//! ## 模块结构
//!
//! - `dto`: 数据传输对象定义
//! - `redemption_service`: 优惠码兑换（含创建与列表）
//! - `certificate_service`: 证书签发与验证
//! - `analytics_service`: 事件埋点与看板汇总

pub mod analytics_service;
pub mod certificate_service;
pub mod dto;
pub mod redemption_service;

pub use analytics_service::AnalyticsService;
pub use certificate_service::CertificateService;
pub use redemption_service::RedemptionService;
