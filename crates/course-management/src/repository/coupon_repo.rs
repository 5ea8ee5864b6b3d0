//! 优惠码仓储
//!
//! 提供优惠码与使用记录的数据访问。兑换流程的写操作全部以 `*_in_tx`
//! 形式提供，由服务层在单个事务内编排。

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::{Coupon, CouponUsage, NewCoupon, NewCouponUsage};

/// 优惠码列表行（附课程标题与使用数，供管理后台展示）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CouponWithCourse {
    pub id: i64,
    pub code: String,
    pub token: String,
    pub course_id: i64,
    pub course_title: String,
    pub max_uses: i32,
    pub current_uses: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub extended_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub usage_count: i64,
}

/// 优惠码仓储
pub struct CouponRepository {
    pool: PgPool,
}

impl CouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 兑换码是否已被占用
    pub async fn code_exists(&self, code: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM coupons WHERE code = $1)")
                .bind(code)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    /// 创建优惠码
    pub async fn create(&self, new: &NewCoupon) -> Result<Coupon> {
        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            INSERT INTO coupons (code, token, course_id, max_uses, current_uses,
                                 is_active, expires_at, admin_id)
            VALUES ($1, $2, $3, $4, 0, TRUE, $5, $6)
            RETURNING id, code, token, course_id, max_uses, current_uses, is_active,
                      expires_at, extended_until, admin_id, created_at
            "#,
        )
        .bind(&new.code)
        .bind(&new.token)
        .bind(new.course_id)
        .bind(new.max_uses)
        .bind(new.expires_at)
        .bind(new.admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// 列出所有优惠码（新建在前，附课程标题与使用数）
    pub async fn list_with_course(&self) -> Result<Vec<CouponWithCourse>> {
        let coupons = sqlx::query_as::<_, CouponWithCourse>(
            r#"
            SELECT cp.id, cp.code, cp.token, cp.course_id, c.title AS course_title,
                   cp.max_uses, cp.current_uses, cp.is_active, cp.expires_at,
                   cp.extended_until, cp.created_at,
                   (SELECT COUNT(*) FROM coupon_usages u WHERE u.coupon_id = cp.id) AS usage_count
            FROM coupons cp
            INNER JOIN courses c ON c.id = cp.course_id
            ORDER BY cp.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(coupons)
    }

    /// 列出某优惠码的使用记录
    pub async fn list_usages(&self, coupon_id: i64) -> Result<Vec<CouponUsage>> {
        let usages = sqlx::query_as::<_, CouponUsage>(
            r#"
            SELECT id, coupon_id, student_name, student_email, ip_address, user_agent, used_at
            FROM coupon_usages
            WHERE coupon_id = $1
            ORDER BY used_at ASC
            "#,
        )
        .bind(coupon_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(usages)
    }

    // ==================== 事务内操作 ====================

    /// 在事务中按兑换码加锁读取（FOR UPDATE）
    ///
    /// 持锁直到事务结束，串行化同一优惠码上的并发兑换
    pub async fn find_by_code_for_update(
        tx: &mut PgConnection,
        code: &str,
    ) -> Result<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(
            r#"
            SELECT id, code, token, course_id, max_uses, current_uses, is_active,
                   expires_at, extended_until, admin_id, created_at
            FROM coupons
            WHERE code = $1
            FOR UPDATE
            "#,
        )
        .bind(code)
        .fetch_optional(tx)
        .await?;

        Ok(coupon)
    }

    /// 在事务中检查某学员是否已使用过该优惠码（邮箱区分大小写精确匹配）
    pub async fn usage_exists_in_tx(
        tx: &mut PgConnection,
        coupon_id: i64,
        student_email: &str,
    ) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM coupon_usages
                WHERE coupon_id = $1 AND student_email = $2
            )
            "#,
        )
        .bind(coupon_id)
        .bind(student_email)
        .fetch_one(tx)
        .await?;

        Ok(exists.0)
    }

    /// 在事务中插入使用记录
    pub async fn insert_usage_in_tx(tx: &mut PgConnection, new: &NewCouponUsage) -> Result<i64> {
        let id: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO coupon_usages (coupon_id, student_name, student_email, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(new.coupon_id)
        .bind(&new.student_name)
        .bind(&new.student_email)
        .bind(&new.ip_address)
        .bind(&new.user_agent)
        .fetch_one(tx)
        .await?;

        Ok(id.0)
    }

    /// 在事务中递增使用计数，条件更新保证不超过上限
    ///
    /// 返回是否实际更新了一行；零行受影响表示名额已被占满，
    /// 调用方应回滚事务并报告已达上限
    pub async fn increment_uses_guarded_in_tx(
        tx: &mut PgConnection,
        coupon_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET current_uses = current_uses + 1
            WHERE id = $1 AND current_uses < max_uses
            "#,
        )
        .bind(coupon_id)
        .execute(tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
