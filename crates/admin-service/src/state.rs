//! 应用状态
//!
//! 持有数据库连接池与各领域服务的共享句柄，随 Router 注入所有处理器

use std::sync::Arc;

use sqlx::PgPool;

use course_management::repository::{
    AnalyticsRepository, CertificateRepository, CouponRepository, CourseRepository,
};
use course_management::service::{AnalyticsService, CertificateService, RedemptionService};

use crate::auth::{JwtConfig, JwtManager};

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt_manager: Arc<JwtManager>,
    pub redemption_service: Arc<RedemptionService>,
    pub certificate_service: Arc<CertificateService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub course_repo: Arc<CourseRepository>,
}

impl AppState {
    /// 组装全部仓储与服务
    pub fn new(pool: PgPool, jwt_config: JwtConfig) -> Self {
        let coupon_repo = Arc::new(CouponRepository::new(pool.clone()));
        let course_repo = Arc::new(CourseRepository::new(pool.clone()));
        let cert_repo = Arc::new(CertificateRepository::new(pool.clone()));
        let analytics_repo = Arc::new(AnalyticsRepository::new(pool.clone()));

        let analytics_service = Arc::new(AnalyticsService::new(analytics_repo));
        let redemption_service = Arc::new(RedemptionService::new(
            coupon_repo,
            course_repo.clone(),
            analytics_service.clone(),
            pool.clone(),
        ));
        let certificate_service = Arc::new(CertificateService::new(
            cert_repo,
            course_repo.clone(),
            analytics_service.clone(),
        ));

        Self {
            pool,
            jwt_manager: Arc::new(JwtManager::new(jwt_config)),
            redemption_service,
            certificate_service,
            analytics_service,
            course_repo,
        }
    }
}
