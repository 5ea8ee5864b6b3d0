//! RedemptionService 集成测试
//!
//! 使用真实 PostgreSQL 测试兑换服务的完整业务流程。
//! 兑换在单个事务内完成使用记录插入与条件计数递增，
//! 无法通过纯 mock 覆盖，因此需要集成测试。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... cargo test --test redemption_service_test -- --ignored
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;

use adima_shared::test_utils::{test_database_config, test_entity_id, test_student_email};
use course_management::error::CourseError;
use course_management::repository::{AnalyticsRepository, CouponRepository, CourseRepository};
use course_management::service::dto::RedeemCouponRequest;
use course_management::service::{AnalyticsService, RedemptionService};

// ==================== 辅助函数 ====================

async fn connect() -> PgPool {
    PgPool::connect(&test_database_config().url)
        .await
        .expect("database connection failed")
}

/// 构建 RedemptionService 实例（真实仓储）
fn setup_service(pool: &PgPool) -> RedemptionService {
    let coupon_repo = Arc::new(CouponRepository::new(pool.clone()));
    let course_repo = Arc::new(CourseRepository::new(pool.clone()));
    let analytics = Arc::new(AnalyticsService::new(Arc::new(AnalyticsRepository::new(
        pool.clone(),
    ))));
    RedemptionService::new(coupon_repo, course_repo, analytics, pool.clone())
}

/// 插入测试管理员（幂等）
async fn ensure_admin(pool: &PgPool, admin_id: i64) {
    sqlx::query(
        r#"
        INSERT INTO admins (id, email, password_hash, name, role)
        VALUES ($1, $2, 'not-a-real-hash', 'Redemption Test Admin', 'admin')
        ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
        "#,
    )
    .bind(admin_id)
    .bind(format!("redemption-test-{}@test.adima.com", admin_id))
    .execute(pool)
    .await
    .expect("插入测试管理员失败");
}

/// 插入测试课程与两份资料
async fn seed_course(pool: &PgPool, course_id: i64, admin_id: i64) {
    ensure_admin(pool, admin_id).await;

    sqlx::query(
        r#"
        INSERT INTO courses (id, title, description, category, price, duration, level, admin_id)
        VALUES ($1, 'Redemption Test Course', 'Course for redemption tests',
                'Development', 49.99, '10 hours', 'Beginner', $2)
        ON CONFLICT (id) DO UPDATE SET title = EXCLUDED.title
        "#,
    )
    .bind(course_id)
    .bind(admin_id)
    .execute(pool)
    .await
    .expect("插入测试课程失败");

    sqlx::query(
        r#"
        INSERT INTO course_materials (course_id, title, material_type, url, sort_order)
        VALUES ($1, 'Intro', 'document', 'https://example.com/intro', 1),
               ($1, 'Module 1', 'video', 'https://example.com/video1', 2)
        "#,
    )
    .bind(course_id)
    .execute(pool)
    .await
    .expect("插入测试资料失败");
}

/// 插入测试优惠码
#[allow(clippy::too_many_arguments)]
async fn seed_coupon(
    pool: &PgPool,
    coupon_id: i64,
    course_id: i64,
    admin_id: i64,
    code: &str,
    max_uses: i32,
    is_active: bool,
    expires_at: Option<chrono::DateTime<Utc>>,
    extended_until: Option<chrono::DateTime<Utc>>,
) {
    sqlx::query(
        r#"
        INSERT INTO coupons (id, code, token, course_id, max_uses, current_uses,
                             is_active, expires_at, extended_until, admin_id)
        VALUES ($1, $2, $3, $4, $5, 0, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET code = EXCLUDED.code
        "#,
    )
    .bind(coupon_id)
    .bind(code)
    .bind(format!("token-{}", coupon_id))
    .bind(course_id)
    .bind(max_uses)
    .bind(is_active)
    .bind(expires_at)
    .bind(extended_until)
    .bind(admin_id)
    .execute(pool)
    .await
    .expect("插入测试优惠码失败");
}

fn redeem_request(code: &str, name: &str, email: &str) -> RedeemCouponRequest {
    RedeemCouponRequest {
        code: code.to_string(),
        student_name: name.to_string(),
        student_email: email.to_string(),
        ip_address: "127.0.0.1".to_string(),
        user_agent: "integration-test".to_string(),
    }
}

fn unique_code(tag: &str) -> String {
    // 兑换码有唯一约束，用熵足够的后缀避免跨测试冲突
    format!("ADIMA-{}{}", tag, test_entity_id() % 100_000)
}

// ==================== 测试用例 ====================

/// 核心场景：maxUses=1 的优惠码首次兑换成功，返回课程资料；
/// 同一邮箱重复兑换报已使用，其他邮箱兑换报已达上限
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_redeem_success_then_duplicate_then_exhausted() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let admin_id = test_entity_id();
    let course_id = test_entity_id();
    let coupon_id = test_entity_id();
    let code = unique_code("T1");

    seed_course(&pool, course_id, admin_id).await;
    seed_coupon(
        &pool, coupon_id, course_id, admin_id, &code, 1, true, None, None,
    )
    .await;

    let alice = test_student_email();

    // 首次兑换成功
    let outcome = service
        .redeem(redeem_request(&code, "Alice", &alice))
        .await
        .expect("首次兑换应成功");
    assert_eq!(outcome.course.id, course_id);
    assert_eq!(outcome.course.materials.len(), 2);
    assert_eq!(outcome.course.materials[0].order, 1);
    assert!(outcome.course.webinars.is_empty());
    assert_eq!(outcome.coupon.current_uses, 1);
    assert_eq!(outcome.coupon.max_uses, 1);

    // 同一邮箱重复兑换
    let err = service
        .redeem(redeem_request(&code, "Alice", &alice))
        .await
        .expect_err("重复兑换应失败");
    assert!(matches!(err, CourseError::CouponAlreadyUsed { .. }));

    // 其他邮箱：名额已满
    let err = service
        .redeem(redeem_request(&code, "Bob", &test_student_email()))
        .await
        .expect_err("超出上限应失败");
    assert!(matches!(err, CourseError::CouponExhausted(_)));

    // 计数不超过上限
    let current_uses: (i32,) =
        sqlx::query_as("SELECT current_uses FROM coupons WHERE id = $1")
            .bind(coupon_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(current_uses.0, 1);
}

/// 两名学员同时兑换 maxUses=1 的优惠码：恰好一个成功，
/// 另一个报已达上限，计数与使用记录都不超过上限
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_concurrent_redeems_respect_usage_limit() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let admin_id = test_entity_id();
    let course_id = test_entity_id();
    let coupon_id = test_entity_id();
    let code = unique_code("T9");

    seed_course(&pool, course_id, admin_id).await;
    seed_coupon(
        &pool, coupon_id, course_id, admin_id, &code, 1, true, None, None,
    )
    .await;

    // 加锁读取串行化两次兑换，后到者看到递增后的计数
    let (first, second) = tokio::join!(
        service.redeem(redeem_request(&code, "Kim", &test_student_email())),
        service.redeem(redeem_request(&code, "Leo", &test_student_email())),
    );

    let results = [first, second];
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok_count, 1, "并发兑换只允许一个成功");

    let err = results
        .into_iter()
        .find_map(|r| r.err())
        .expect("另一次兑换应失败");
    assert!(matches!(err, CourseError::CouponExhausted(_)));

    let (current_uses, usage_count): (i32, i64) = sqlx::query_as(
        r#"
        SELECT current_uses,
               (SELECT COUNT(*) FROM coupon_usages WHERE coupon_id = $1)
        FROM coupons WHERE id = $1
        "#,
    )
    .bind(coupon_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(current_uses, 1);
    assert_eq!(usage_count, 1);
}

/// 兑换码大小写不敏感：小写输入命中大写存储的兑换码
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_redeem_code_is_case_insensitive() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let admin_id = test_entity_id();
    let course_id = test_entity_id();
    let coupon_id = test_entity_id();
    let code = unique_code("T2");

    seed_course(&pool, course_id, admin_id).await;
    seed_coupon(
        &pool, coupon_id, course_id, admin_id, &code, 5, true, None, None,
    )
    .await;

    let outcome = service
        .redeem(redeem_request(
            &code.to_lowercase(),
            "Carol",
            &test_student_email(),
        ))
        .await
        .expect("小写兑换码应命中");
    assert_eq!(outcome.coupon.code, code);
}

/// 未知兑换码
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_redeem_unknown_code() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let err = service
        .redeem(redeem_request(
            "ADIMA-NO-SUCH-CODE",
            "Dave",
            &test_student_email(),
        ))
        .await
        .expect_err("未知兑换码应失败");
    assert!(matches!(err, CourseError::CouponNotFound(_)));
}

/// 停用的优惠码：无论余量多少都拒绝
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_redeem_inactive_coupon() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let admin_id = test_entity_id();
    let course_id = test_entity_id();
    let coupon_id = test_entity_id();
    let code = unique_code("T3");

    seed_course(&pool, course_id, admin_id).await;
    seed_coupon(
        &pool, coupon_id, course_id, admin_id, &code, 10, false, None, None,
    )
    .await;

    let err = service
        .redeem(redeem_request(&code, "Erin", &test_student_email()))
        .await
        .expect_err("停用优惠码应失败");
    assert!(matches!(err, CourseError::CouponInactive(_)));
}

/// 有效期：已过期且未延期拒绝；延期到未来可继续兑换
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_redeem_expiry_and_extension() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let admin_id = test_entity_id();
    let course_id = test_entity_id();
    seed_course(&pool, course_id, admin_id).await;

    let past = Utc::now() - Duration::days(1);
    let future = Utc::now() + Duration::days(1);

    // 已过期、无延期
    let expired_id = test_entity_id();
    let expired_code = unique_code("T4");
    seed_coupon(
        &pool,
        expired_id,
        course_id,
        admin_id,
        &expired_code,
        5,
        true,
        Some(past),
        None,
    )
    .await;

    let err = service
        .redeem(redeem_request(&expired_code, "Frank", &test_student_email()))
        .await
        .expect_err("过期优惠码应失败");
    assert!(matches!(err, CourseError::CouponExpired(_)));

    // 已过期、延期到未来
    let extended_id = test_entity_id();
    let extended_code = unique_code("T5");
    seed_coupon(
        &pool,
        extended_id,
        course_id,
        admin_id,
        &extended_code,
        5,
        true,
        Some(past),
        Some(future),
    )
    .await;

    service
        .redeem(redeem_request(&extended_code, "Grace", &test_student_email()))
        .await
        .expect("延期覆盖过期时间，应兑换成功");

    // 已过期、延期也已过
    let lapsed_id = test_entity_id();
    let lapsed_code = unique_code("T6");
    seed_coupon(
        &pool,
        lapsed_id,
        course_id,
        admin_id,
        &lapsed_code,
        5,
        true,
        Some(past),
        Some(past),
    )
    .await;

    let err = service
        .redeem(redeem_request(&lapsed_code, "Heidi", &test_student_email()))
        .await
        .expect_err("延期已过的优惠码应失败");
    assert!(matches!(err, CourseError::CouponExpired(_)));
}

/// 兑换失败时不留下使用记录（校验在写入之前，事务保证原子性）
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_failed_redeem_leaves_no_usage_row() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let admin_id = test_entity_id();
    let course_id = test_entity_id();
    let coupon_id = test_entity_id();
    let code = unique_code("T7");

    seed_course(&pool, course_id, admin_id).await;
    seed_coupon(
        &pool, coupon_id, course_id, admin_id, &code, 5, false, None, None,
    )
    .await;

    let email = test_student_email();
    let _ = service
        .redeem(redeem_request(&code, "Ivan", &email))
        .await
        .expect_err("停用优惠码应失败");

    let usage_count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM coupon_usages WHERE coupon_id = $1")
            .bind(coupon_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(usage_count.0, 0);
}

/// 成功兑换会追加 coupon_used 埋点事件
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_redeem_records_analytics_event() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let admin_id = test_entity_id();
    let course_id = test_entity_id();
    let coupon_id = test_entity_id();
    let code = unique_code("T8");

    seed_course(&pool, course_id, admin_id).await;
    seed_coupon(
        &pool, coupon_id, course_id, admin_id, &code, 5, true, None, None,
    )
    .await;

    service
        .redeem(redeem_request(&code, "Judy", &test_student_email()))
        .await
        .expect("兑换应成功");

    let event_count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM analytics WHERE event_type = 'coupon_used' AND event_data LIKE $1",
    )
    .bind(format!("%{}%", code))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(event_count.0, 1);
}

/// 管理端列表每条记录内嵌所属课程与完整使用记录
#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_list_coupons_embeds_course_and_usages() {
    let pool = connect().await;
    let service = setup_service(&pool);

    let admin_id = test_entity_id();
    let course_id = test_entity_id();
    let coupon_id = test_entity_id();
    let code = unique_code("TA");

    seed_course(&pool, course_id, admin_id).await;
    seed_coupon(
        &pool, coupon_id, course_id, admin_id, &code, 5, true, None, None,
    )
    .await;

    let email = test_student_email();
    service
        .redeem(redeem_request(&code, "Mallory", &email))
        .await
        .expect("兑换应成功");

    let coupons = service.list_coupons().await.expect("列表查询应成功");
    let entry = coupons
        .iter()
        .find(|c| c.code == code)
        .expect("列表应包含新建的优惠码");

    assert_eq!(entry.course.id, course_id);
    assert_eq!(entry.course.title, "Redemption Test Course");
    assert_eq!(entry.usage_count, 1);
    assert_eq!(entry.usages.len(), 1);
    assert_eq!(entry.usages[0].student_email, email);
    assert_eq!(entry.current_uses, 1);
}
