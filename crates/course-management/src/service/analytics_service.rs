//! 分析事件服务
//!
//! 事件日志是纯追加的副作用通道：主流程（兑换、验证）的埋点失败
//! 只记日志，绝不阻断主操作的成功路径。

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde_json::Value;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::models::{NewAnalyticsEvent, event_types};
use crate::repository::AnalyticsRepository;
use crate::service::dto::AnalyticsSummary;

/// 分析事件服务
pub struct AnalyticsService {
    repo: Arc<AnalyticsRepository>,
}

impl AnalyticsService {
    pub fn new(repo: Arc<AnalyticsRepository>) -> Self {
        Self { repo }
    }

    /// 追加一条事件
    ///
    /// event_data 为字符串时原样存储，否则序列化为紧凑 JSON
    #[instrument(skip(self, event_data))]
    pub async fn track(
        &self,
        event_type: &str,
        event_data: &Value,
        ip_address: &str,
        user_agent: &str,
    ) -> Result<()> {
        let payload = match event_data {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        self.repo
            .insert(&NewAnalyticsEvent {
                event_type: event_type.to_string(),
                event_data: payload,
                ip_address: ip_address.to_string(),
                user_agent: user_agent.to_string(),
            })
            .await
    }

    /// 尽力而为的埋点：失败只记 warn 日志
    pub async fn track_silently(
        &self,
        event_type: &str,
        event_data: &Value,
        ip_address: &str,
        user_agent: &str,
    ) {
        if let Err(e) = self
            .track(event_type, event_data, ip_address, user_agent)
            .await
        {
            warn!(event_type, error = %e, "埋点写入失败，已忽略");
        }
    }

    /// 管理看板汇总
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<AnalyticsSummary> {
        let now = Utc::now();
        let start_of_month = start_of_month(now);
        let thirty_days_ago = now - Duration::days(30);

        let total_downloads = self.repo.count_by_type(event_types::DOWNLOAD).await?;
        let monthly_downloads = self
            .repo
            .count_by_type_since(event_types::DOWNLOAD, start_of_month)
            .await?;
        let coupon_redemptions = self.repo.count_coupon_usages().await?;
        let certificate_verifications = self
            .repo
            .count_by_type(event_types::CERTIFICATE_VERIFIED)
            .await?;
        let active_students = self.repo.count_active_students(thirty_days_ago).await?;
        let popular_courses = self.repo.course_popularity().await?;

        Ok(AnalyticsSummary {
            total_downloads,
            monthly_downloads,
            coupon_redemptions,
            certificate_verifications,
            active_students,
            popular_courses,
        })
    }
}

/// 当月起点（UTC 零点）
fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .unwrap_or(now)
}
