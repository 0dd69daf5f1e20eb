use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct ClassQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 创建班级请求
//
// # teacher_id
// - 教师创建：可省略，默认使用当前教师；若填写必须等于自己的 ID
// - 管理员创建：必填，且目标用户必须是教师
//
// code 省略时自动生成
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub teacher_id: Option<i64>,
    pub title: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct UpdateClassRequest {
    pub title: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct JoinClassRequest {
    pub code: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct AddStudentRequest {
    pub student_id: i64,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: u64,
    pub size: u64,
    /// 仅返回该教师的班级
    pub teacher_id: Option<i64>,
    /// 仅返回该学生已加入的班级
    pub student_id: Option<i64>,
}

// 新建班级（用于存储层，teacher_id 与 code 已由服务层确定）
#[derive(Debug, Clone)]
pub struct NewClass {
    pub teacher_id: i64,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub subject: Option<String>,
}
