//! 课程仓储
//!
//! 提供课程与课程资料的数据访问

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Course, CourseMaterial, NewCourse, NewCourseMaterial};

/// 课程列表行（附优惠码/证书计数，供管理后台展示）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithCounts {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub duration: String,
    pub level: String,
    pub is_active: bool,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub coupon_count: i64,
    pub certificate_count: i64,
}

/// 课程仓储
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 获取单个课程
    pub async fn get(&self, id: i64) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, category, price, duration, level,
                   is_active, admin_id, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    /// 课程是否存在
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    /// 列出所有课程（新建在前，附优惠码/证书计数）
    pub async fn list_with_counts(&self) -> Result<Vec<CourseWithCounts>> {
        let courses = sqlx::query_as::<_, CourseWithCounts>(
            r#"
            SELECT c.id, c.title, c.description, c.category, c.price, c.duration,
                   c.level, c.is_active, c.admin_id, c.created_at, c.updated_at,
                   (SELECT COUNT(*) FROM coupons cp WHERE cp.course_id = c.id) AS coupon_count,
                   (SELECT COUNT(*) FROM certificates ct WHERE ct.course_id = c.id) AS certificate_count
            FROM courses c
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    /// 创建课程
    pub async fn create(&self, new: &NewCourse) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description, category, price, duration, level, admin_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, category, price, duration, level,
                      is_active, admin_id, created_at, updated_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.category)
        .bind(new.price)
        .bind(&new.duration)
        .bind(&new.level)
        .bind(new.admin_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    /// 列出课程资料（按 sort_order 升序）
    pub async fn list_materials(&self, course_id: i64) -> Result<Vec<CourseMaterial>> {
        let materials = sqlx::query_as::<_, CourseMaterial>(
            r#"
            SELECT id, course_id, title, material_type, url, description, sort_order
            FROM course_materials
            WHERE course_id = $1
            ORDER BY sort_order ASC
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(materials)
    }

    /// 创建课程资料
    pub async fn create_material(&self, new: &NewCourseMaterial) -> Result<i64> {
        let id: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO course_materials (course_id, title, material_type, url, description, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(new.course_id)
        .bind(&new.title)
        .bind(new.material_type)
        .bind(&new.url)
        .bind(&new.description)
        .bind(new.sort_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(id.0)
    }
}
