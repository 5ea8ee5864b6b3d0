//! 分析事件处理器
//!
//! 公开的事件埋点接口与管理端数据看板

use axum::{Json, extract::State, http::HeaderMap};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ApiError, Result};
use crate::handlers::client_meta;
use crate::state::AppState;

/// 埋点请求
///
/// eventData 允许任意 JSON 值：字符串原样存储，其余序列化后存储
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventRequest {
    pub event_type: Option<String>,
    pub event_data: Option<Value>,
}

/// 追加埋点事件（公开接口）
///
/// POST /api/analytics/track
pub async fn track_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TrackEventRequest>,
) -> Result<Json<Value>> {
    let (event_type, event_data) = match (req.event_type, req.event_data) {
        (Some(t), Some(d)) if !t.is_empty() => (t, d),
        _ => {
            return Err(ApiError::Validation(
                "Event type and data are required".to_string(),
            ));
        }
    };

    let (ip_address, user_agent) = client_meta(&headers);

    state
        .analytics_service
        .track(&event_type, &event_data, &ip_address, &user_agent)
        .await?;

    Ok(Json(json!({ "message": "Event tracked successfully" })))
}

/// 数据看板汇总（管理端）
///
/// GET /api/admin/analytics
pub async fn analytics_summary(State(state): State<AppState>) -> Result<Json<Value>> {
    let summary = state.analytics_service.summary().await?;

    Ok(Json(serde_json::to_value(summary).map_err(|e| {
        ApiError::Internal(format!("序列化看板数据失败: {}", e))
    })?))
}
