use crate::domain::projection::ClassRow;
use crate::models::common::PaginationInfo;
use crate::models::users::User;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<ClassRow>,
}

/// 管理员班级列表（不分页）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct ClassRowsResponse {
    pub items: Vec<ClassRow>,
}

/// 班级详情，学生名单只对管理者返回
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct ClassDetailResponse {
    pub class: ClassRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub students: Option<Vec<User>>,
}
