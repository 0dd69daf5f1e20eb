use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未指定时的满分
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    // 所属班级
    pub class_id: i64,
    // 布置教师
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 截止时间
    pub due_at: chrono::DateTime<chrono::Utc>,
    pub max_score: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
