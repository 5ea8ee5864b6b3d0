//! HTTP 处理器模块

pub mod analytics;
pub mod auth;
pub mod certificate;
pub mod contact;
pub mod coupon;
pub mod course;

use axum::http::HeaderMap;

/// 从请求头提取客户端来源信息 (ip, user_agent)
///
/// 服务部署在反向代理之后，客户端 IP 取 x-forwarded-for 的第一跳；
/// 缺失时统一落 "unknown"
pub(crate) fn client_meta(headers: &HeaderMap) -> (String, String) {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    (ip, user_agent)
}
