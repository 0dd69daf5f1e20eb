use super::entities::User;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

/// 最近注册的用户
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/user.ts")]
pub struct RecentUsersResponse {
    pub items: Vec<User>,
}
