use serde::Deserialize;
use ts_rs::TS;

/// 管理员列表的搜索参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct AdminSearchParams {
    pub search: Option<String>,
}
