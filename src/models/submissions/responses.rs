use serde::Serialize;
use ts_rs::TS;

use crate::domain::aggregate::SubmissionTally;
use crate::domain::projection::SubmissionRow;

/// 提交列表（附带统计）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionRow>,
    pub tally: SubmissionTally,
}
