use serde::Serialize;
use ts_rs::TS;

use crate::domain::aggregate::{
    AssignmentSubmissionCount, ClassEnrollment, DashboardTotals, MonthCount, RoleCount,
};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct UserAnalyticsResponse {
    pub users_by_role: Vec<RoleCount>,
    pub users_by_month: Vec<MonthCount>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct ClassAnalyticsResponse {
    pub classes_by_month: Vec<MonthCount>,
    pub classes_with_student_count: Vec<ClassEnrollment>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct AssignmentAnalyticsResponse {
    pub assignments_by_month: Vec<MonthCount>,
    pub submissions_by_assignment: Vec<AssignmentSubmissionCount>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct DashboardStatsResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub totals: DashboardTotals,
    /// 服务运行时长（秒）
    pub uptime_seconds: i64,
}
