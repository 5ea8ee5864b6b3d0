//! 优惠码相关实体定义
//!
//! 优惠码授予对单个课程资料的访问权，带使用上限和可选的有效期/延期

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 优惠码
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: i64,
    /// 兑换码（唯一，形如 ADIMA-XXXXXXXX）
    pub code: String,
    /// 随机访问令牌（唯一）
    pub token: String,
    pub course_id: i64,
    pub max_uses: i32,
    pub current_uses: i32,
    pub is_active: bool,
    /// 过期时间（为空表示永不过期）
    pub expires_at: Option<DateTime<Utc>>,
    /// 延期截止时间：晚于当前时间时覆盖已过期的 expires_at
    pub extended_until: Option<DateTime<Utc>>,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// 判断优惠码在给定时刻是否已过期
    ///
    /// expires_at 已过且 extended_until 为空或同样已过时视为过期；
    /// 未来的 extended_until 会覆盖已过期的 expires_at。
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) if expires < now => match self.extended_until {
                Some(extended) => extended < now,
                None => true,
            },
            _ => false,
        }
    }

    /// 判断使用次数是否已达上限
    pub fn is_exhausted(&self) -> bool {
        self.current_uses >= self.max_uses
    }
}

/// 优惠码使用记录
///
/// 一名学员成功兑换一次产生一条记录；同一 (coupon_id, student_email)
/// 至多一条，由兑换事务内的存在性检查保证
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CouponUsage {
    pub id: i64,
    pub coupon_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub ip_address: String,
    pub user_agent: String,
    pub used_at: DateTime<Utc>,
}

/// 新建优惠码
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub token: String,
    pub course_id: i64,
    pub max_uses: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub admin_id: i64,
}

/// 新建使用记录
#[derive(Debug, Clone)]
pub struct NewCouponUsage {
    pub coupon_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub ip_address: String,
    pub user_agent: String,
}
