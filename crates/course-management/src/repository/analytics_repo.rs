//! 分析事件仓储
//!
//! 事件表只追加；本仓储同时承担管理看板的聚合查询

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::NewAnalyticsEvent;

/// 课程热度行（按兑换人次排序）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PopularCourseRow {
    pub id: i64,
    pub title: String,
    pub student_count: i64,
}

/// 分析事件仓储
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 追加一条事件
    pub async fn insert(&self, new: &NewAnalyticsEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO analytics (event_type, event_data, ip_address, user_agent)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&new.event_type)
        .bind(&new.event_data)
        .bind(&new.ip_address)
        .bind(&new.user_agent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 统计某类型事件总数
    pub async fn count_by_type(&self, event_type: &str) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM analytics WHERE event_type = $1")
                .bind(event_type)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// 统计某类型事件自给定时刻以来的数量
    pub async fn count_by_type_since(
        &self,
        event_type: &str,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM analytics WHERE event_type = $1 AND created_at >= $2",
        )
        .bind(event_type)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// 统计优惠码兑换总次数
    pub async fn count_coupon_usages(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM coupon_usages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// 统计活跃学员数（给定时刻以来产生过兑换的去重邮箱数）
    pub async fn count_active_students(&self, since: DateTime<Utc>) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT student_email) FROM coupon_usages WHERE used_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// 课程热度排行（仅含配置过优惠码的课程，按兑换人次降序）
    pub async fn course_popularity(&self) -> Result<Vec<PopularCourseRow>> {
        let rows = sqlx::query_as::<_, PopularCourseRow>(
            r#"
            SELECT c.id, c.title, COUNT(u.id) AS student_count
            FROM courses c
            INNER JOIN coupons cp ON cp.course_id = c.id
            LEFT JOIN coupon_usages u ON u.coupon_id = cp.id
            GROUP BY c.id, c.title
            ORDER BY student_count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
