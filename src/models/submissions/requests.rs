use serde::Deserialize;
use ts_rs::TS;

use crate::domain::filter::{ClassFilter, StatusFilter};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct SubmitAssignmentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

/// 教师提交列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct TeacherSubmissionParams {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    #[ts(type = "string")]
    pub class_id: ClassFilter,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// 单个作业的提交列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct AssignmentSubmissionParams {
    #[serde(default)]
    pub status: StatusFilter,
    pub search: Option<String>,
}

// 提交写入（用于存储层），同一学生同一作业只保留一条
#[derive(Debug, Clone)]
pub struct SubmissionUpsert {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    pub status: crate::models::submissions::SubmissionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

// 评分写入（用于存储层）
#[derive(Debug, Clone)]
pub struct GradeInput {
    pub score: f64,
    pub feedback: Option<String>,
    pub graded_by: i64,
}
