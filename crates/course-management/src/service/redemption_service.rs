//! 优惠码兑换服务
//!
//! 处理优惠码兑换的核心业务逻辑，包括：
//! - 状态校验（启用、有效期/延期、使用上限、同学员重复兑换）
//! - 事务性写入（使用记录插入 + 条件递增计数）
//! - 兑换成功后的尽力而为埋点
//!
//! ## 兑换流程
//!
//! 1. 规范化兑换码 -> 2. 事务内加锁读取 -> 3. 状态校验
//!    -> 4. 插入使用记录 -> 5. 条件递增计数 -> 6. 提交
//!    -> 7. 埋点 -> 8. 返回课程视图
//!
//! 使用记录与计数递增在同一事务内完成，计数递增带
//! `current_uses < max_uses` 守卫条件，零行更新即回滚，
//! 保证并发兑换下 current_uses 永不超过 max_uses。

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{CourseError, Result};
use crate::models::{Coupon, NewCoupon, NewCouponUsage, event_types};
use crate::repository::{CouponRepository, CourseRepository};
use crate::service::AnalyticsService;
use crate::service::dto::{
    CouponAdminView, CouponSummary, CourseAccessView, CourseRef, CreateCouponRequest,
    MaterialView, RedeemCouponRequest, RedeemOutcome,
};

/// 兑换码随机部分的字符表（大写 base-36）
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 兑换码生成的最大重试次数
const CODE_GENERATION_ATTEMPTS: usize = 5;

/// 优惠码兑换服务
pub struct RedemptionService {
    coupon_repo: Arc<CouponRepository>,
    course_repo: Arc<CourseRepository>,
    analytics: Arc<AnalyticsService>,
    pool: PgPool,
}

impl RedemptionService {
    pub fn new(
        coupon_repo: Arc<CouponRepository>,
        course_repo: Arc<CourseRepository>,
        analytics: Arc<AnalyticsService>,
        pool: PgPool,
    ) -> Self {
        Self {
            coupon_repo,
            course_repo,
            analytics,
            pool,
        }
    }

    /// 兑换优惠码
    ///
    /// 成功时返回课程访问视图与兑换后的优惠码摘要；
    /// 所有状态校验失败均以具体错误变体返回，调用方据此映射状态码
    #[instrument(skip(self, request), fields(code = %request.code, student_email = %request.student_email))]
    pub async fn redeem(&self, request: RedeemCouponRequest) -> Result<RedeemOutcome> {
        let code = request.code.trim().to_uppercase();

        let mut tx = self.pool.begin().await?;

        // 加锁读取，串行化同一优惠码上的并发兑换
        let coupon = CouponRepository::find_by_code_for_update(&mut tx, &code)
            .await?
            .ok_or_else(|| CourseError::CouponNotFound(code.clone()))?;

        self.check_redeemable(&coupon, &request.student_email, &mut tx)
            .await?;

        // 使用记录与计数递增同属一个事务
        CouponRepository::insert_usage_in_tx(
            &mut tx,
            &NewCouponUsage {
                coupon_id: coupon.id,
                student_name: request.student_name.clone(),
                student_email: request.student_email.clone(),
                ip_address: request.ip_address.clone(),
                user_agent: request.user_agent.clone(),
            },
        )
        .await?;

        let incremented =
            CouponRepository::increment_uses_guarded_in_tx(&mut tx, coupon.id).await?;
        if !incremented {
            // 守卫条件未命中：名额已被占满，回滚使用记录
            tx.rollback().await?;
            return Err(CourseError::CouponExhausted(code));
        }

        tx.commit().await?;

        // 埋点失败不影响兑换结果
        self.analytics
            .track_silently(
                event_types::COUPON_USED,
                &json!({
                    "couponCode": code,
                    "studentName": request.student_name,
                    "studentEmail": request.student_email,
                    "courseId": coupon.course_id,
                }),
                &request.ip_address,
                &request.user_agent,
            )
            .await;

        let course_view = self.load_course_view(coupon.course_id).await?;

        info!(
            code = %code,
            course_id = coupon.course_id,
            "优惠码兑换成功"
        );

        Ok(RedeemOutcome {
            course: course_view,
            coupon: CouponSummary {
                code: coupon.code,
                max_uses: coupon.max_uses,
                current_uses: coupon.current_uses + 1,
            },
        })
    }

    /// 创建优惠码（管理端）
    ///
    /// 校验课程存在后生成唯一兑换码与随机令牌
    #[instrument(skip(self, request), fields(course_id = request.course_id))]
    pub async fn create_coupon(&self, request: CreateCouponRequest) -> Result<Coupon> {
        if request.max_uses < 1 {
            return Err(CourseError::Validation(
                "Course ID and max uses are required".to_string(),
            ));
        }

        if !self.course_repo.exists(request.course_id).await? {
            return Err(CourseError::CourseNotFound(request.course_id));
        }

        let code = self.generate_unique_code().await?;
        let token = Uuid::new_v4().to_string();

        let coupon = self
            .coupon_repo
            .create(&NewCoupon {
                code: code.clone(),
                token,
                course_id: request.course_id,
                max_uses: request.max_uses,
                expires_at: request.expires_at,
                admin_id: request.admin_id,
            })
            .await?;

        info!(code = %code, course_id = request.course_id, "优惠码已创建");

        Ok(coupon)
    }

    /// 列出所有优惠码（管理端）
    ///
    /// 每条记录内嵌所属课程与完整使用记录列表
    pub async fn list_coupons(&self) -> Result<Vec<CouponAdminView>> {
        let rows = self.coupon_repo.list_with_course().await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let usages = self.coupon_repo.list_usages(row.id).await?;
            views.push(CouponAdminView {
                id: row.id,
                code: row.code,
                token: row.token,
                course_id: row.course_id,
                course: CourseRef {
                    id: row.course_id,
                    title: row.course_title,
                },
                max_uses: row.max_uses,
                current_uses: row.current_uses,
                is_active: row.is_active,
                expires_at: row.expires_at,
                extended_until: row.extended_until,
                created_at: row.created_at,
                usages,
                usage_count: row.usage_count,
            });
        }

        Ok(views)
    }

    // ==================== 私有方法 ====================

    /// 状态校验：启用、有效期、使用上限、同学员重复兑换
    async fn check_redeemable(
        &self,
        coupon: &Coupon,
        student_email: &str,
        tx: &mut sqlx::PgConnection,
    ) -> Result<()> {
        if !coupon.is_active {
            return Err(CourseError::CouponInactive(coupon.code.clone()));
        }

        if coupon.is_expired(Utc::now()) {
            return Err(CourseError::CouponExpired(coupon.code.clone()));
        }

        if coupon.is_exhausted() {
            return Err(CourseError::CouponExhausted(coupon.code.clone()));
        }

        if CouponRepository::usage_exists_in_tx(tx, coupon.id, student_email).await? {
            return Err(CourseError::CouponAlreadyUsed {
                code: coupon.code.clone(),
                student_email: student_email.to_string(),
            });
        }

        Ok(())
    }

    /// 组装课程访问视图（含按序资料列表）
    async fn load_course_view(&self, course_id: i64) -> Result<CourseAccessView> {
        let course = self
            .course_repo
            .get(course_id)
            .await?
            .ok_or(CourseError::CourseNotFound(course_id))?;

        let materials = self
            .course_repo
            .list_materials(course_id)
            .await?
            .into_iter()
            .map(|m| MaterialView {
                id: m.id,
                title: m.title,
                material_type: m.material_type,
                url: m.url,
                description: m.description,
                order: m.sort_order,
            })
            .collect();

        Ok(CourseAccessView {
            id: course.id,
            title: course.title,
            description: course.description,
            category: course.category,
            level: course.level,
            duration: course.duration,
            materials,
            webinars: Vec::new(),
        })
    }

    /// 生成未被占用的兑换码，有限次重试
    async fn generate_unique_code(&self) -> Result<String> {
        for _ in 0..CODE_GENERATION_ATTEMPTS {
            let code = generate_coupon_code();
            if !self.coupon_repo.code_exists(&code).await? {
                return Ok(code);
            }
        }

        Err(CourseError::Internal(
            "coupon code space exhausted after repeated collisions".to_string(),
        ))
    }
}

/// 生成兑换码：ADIMA- 前缀 + 8 位大写 base-36 随机字符
pub fn generate_coupon_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..8)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect();
    format!("ADIMA-{}", suffix)
}
