//! 课程与课程资料实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 课程资料类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum MaterialType {
    /// 文档（PDF、讲义等）
    #[default]
    Document,
    /// 视频
    Video,
    /// 外部链接
    Link,
}

/// 课程
///
/// 平台售卖的在线课程，由管理员创建；资料和优惠码均挂在课程之下
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// 课程分类（如 Development、Marketing）
    pub category: String,
    pub price: f64,
    /// 课程时长（展示用文本，如 "40 hours"）
    pub duration: String,
    /// 难度等级（如 Beginner、Intermediate）
    pub level: String,
    pub is_active: bool,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 课程资料
///
/// 属于某个课程的单份学习材料，按 sort_order 排序展示
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourseMaterial {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub material_type: MaterialType,
    pub url: String,
    #[sqlx(default)]
    pub description: Option<String>,
    pub sort_order: i32,
}

/// 新建课程
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub duration: String,
    pub level: String,
    pub admin_id: i64,
}

/// 新建课程资料
#[derive(Debug, Clone)]
pub struct NewCourseMaterial {
    pub course_id: i64,
    pub title: String,
    pub material_type: MaterialType,
    pub url: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_type_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&MaterialType::Document).unwrap(),
            "\"document\""
        );
        assert_eq!(
            serde_json::from_str::<MaterialType>("\"video\"").unwrap(),
            MaterialType::Video
        );
        assert_eq!(
            serde_json::from_str::<MaterialType>("\"link\"").unwrap(),
            MaterialType::Link
        );
    }
}
