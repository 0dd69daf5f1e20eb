use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct Class {
    pub id: i64,
    // 班级名称
    pub title: String,
    // 加入码（唯一）
    pub code: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    // 负责教师
    pub teacher_id: i64,
    // 已选课学生
    pub student_ids: Vec<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    pub fn has_student(&self, student_id: i64) -> bool {
        self.student_ids.contains(&student_id)
    }

    pub fn student_count(&self) -> i64 {
        self.student_ids.len() as i64
    }
}
