//! 数据库种子程序
//!
//! 写入默认管理员账号与示例课程，可重复执行（幂等）。
//!
//! ```bash
//! cargo run --bin adima-seed
//! ```

use adima_admin_service::auth::hash_password;
use adima_shared::{config::AppConfig, database::Database, observability};
use course_management::models::MaterialType;
use sqlx::PgPool;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 配置文件缺失时使用默认值，存在但非法时直接报错退出
    let config = AppConfig::load("adima-seed")?;
    observability::init(&config.observability)?;

    let db = Database::connect(&config.database).await?;

    sqlx::migrate!("../../migrations").run(db.pool()).await?;
    info!("Migrations applied");

    let admin_id = seed_admin(db.pool()).await?;
    seed_courses(db.pool(), admin_id).await?;

    info!("Seed complete");
    Ok(())
}

/// 写入默认管理员（admin@adima.com / admin123）
async fn seed_admin(pool: &PgPool) -> anyhow::Result<i64> {
    let password_hash =
        hash_password("admin123").map_err(|e| anyhow::anyhow!("密码哈希失败: {}", e))?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO admins (email, password_hash, name, role)
        VALUES ($1, $2, 'ADIMA Admin', 'admin')
        ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind("admin@adima.com")
    .bind(&password_hash)
    .fetch_one(pool)
    .await?;

    info!(admin_id = id, "默认管理员已就绪: admin@adima.com");
    Ok(id)
}

/// 示例课程定义：(标题, 描述, 分类, 价格, 时长, 难度)
const SAMPLE_COURSES: [(&str, &str, &str, f64, &str, &str); 4] = [
    (
        "Complete Web Development Bootcamp",
        "Learn HTML, CSS, JavaScript, React, and Node.js from scratch",
        "Development",
        299.99,
        "40 hours",
        "Beginner",
    ),
    (
        "Digital Marketing Mastery",
        "Master SEO, social media marketing, and paid advertising",
        "Marketing",
        199.99,
        "25 hours",
        "Intermediate",
    ),
    (
        "Data Science with Python",
        "Learn data analysis, visualization, and machine learning",
        "Data Science",
        349.99,
        "50 hours",
        "Intermediate",
    ),
    (
        "UI/UX Design Fundamentals",
        "Design beautiful and user-friendly interfaces",
        "Design",
        249.99,
        "30 hours",
        "Beginner",
    ),
];

/// 写入示例课程与配套资料
///
/// 以课程标题判重，重复执行不会产生冗余数据
async fn seed_courses(pool: &PgPool, admin_id: i64) -> anyhow::Result<()> {
    for (title, description, category, price, duration, level) in SAMPLE_COURSES {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM courses WHERE title = $1")
                .bind(title)
                .fetch_optional(pool)
                .await?;

        if existing.is_some() {
            info!(title, "课程已存在，跳过");
            continue;
        }

        let (course_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO courses (title, description, category, price, duration, level, admin_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(category)
        .bind(price)
        .bind(duration)
        .bind(level)
        .bind(admin_id)
        .fetch_one(pool)
        .await?;

        let materials = [
            ("Course Introduction", MaterialType::Video, 1),
            ("Course Slides", MaterialType::Document, 2),
            ("Exercise Files", MaterialType::Document, 3),
            ("Additional Resources", MaterialType::Link, 4),
        ];

        for (material_title, material_type, sort_order) in materials {
            sqlx::query(
                r#"
                INSERT INTO course_materials (course_id, title, material_type, url, sort_order)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(course_id)
            .bind(material_title)
            .bind(material_type)
            .bind(format!(
                "https://materials.adima.com/{}/{}",
                course_id, sort_order
            ))
            .bind(sort_order)
            .execute(pool)
            .await?;
        }

        info!(title, course_id, "示例课程已创建");
    }

    Ok(())
}
