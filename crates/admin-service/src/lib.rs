//! ADIMA 管理后台服务
//!
//! 对外提供两组 REST API：
//! - 公开接口：优惠码兑换、证书验证、事件埋点、联系表单
//! - 管理接口（JWT 认证）：课程/优惠码/证书管理与数据看板

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, Result};
pub use state::AppState;
