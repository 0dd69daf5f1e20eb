use serde::Serialize;
use ts_rs::TS;

use crate::domain::projection::AssignmentRow;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/assignment.ts")]
pub struct AssignmentListResponse {
    pub items: Vec<AssignmentRow>,
}
