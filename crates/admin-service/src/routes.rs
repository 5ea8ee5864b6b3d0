//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// 公开路由（无需认证）
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/coupons/validate", post(handlers::coupon::validate_coupon))
        .route(
            "/certificates/verify",
            post(handlers::certificate::verify_certificate),
        )
        .route("/analytics/track", post(handlers::analytics::track_event))
        .route("/contact/submit", post(handlers::contact::submit_contact))
}

/// 管理端路由（除 login 外均由认证中间件保护）
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/courses", get(handlers::course::list_courses))
        .route("/courses", post(handlers::course::create_course))
        .route("/coupons", get(handlers::coupon::list_coupons))
        .route("/coupons", post(handlers::coupon::create_coupon))
        .route(
            "/certificates",
            get(handlers::certificate::list_certificates),
        )
        .route(
            "/certificates",
            post(handlers::certificate::issue_certificate),
        )
        .route("/analytics", get(handlers::analytics::analytics_summary))
}

/// 组装 /api 下的全部路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .nest("/admin", admin_routes())
}
