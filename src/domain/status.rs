use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// "即将截止" 窗口长度（小时）
pub const DUE_SOON_HOURS: i64 = 24;

/// 由截止时间推导出的作业状态，从不持久化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../client/src/types/generated/assignment.ts")]
pub enum DueStatus {
    Active,
    DueSoon,
    Overdue,
}

impl DueStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DueStatus::Active => "Active",
            DueStatus::DueSoon => "Due Soon",
            DueStatus::Overdue => "Overdue",
        }
    }
}

impl std::fmt::Display for DueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 在给定时刻对截止时间分类
///
/// - `due < now` => `Overdue`
/// - `0 <= due - now < 24h` => `DueSoon`
/// - 其余 => `Active`
pub fn classify(due: DateTime<Utc>, now: DateTime<Utc>) -> DueStatus {
    if due < now {
        DueStatus::Overdue
    } else if due - now < TimeDelta::hours(DUE_SOON_HOURS) {
        DueStatus::DueSoon
    } else {
        DueStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_one_hour_ahead_is_due_soon() {
        assert_eq!(classify(now() + TimeDelta::hours(1), now()), DueStatus::DueSoon);
    }

    #[test]
    fn test_one_second_past_is_overdue() {
        assert_eq!(classify(now() - TimeDelta::seconds(1), now()), DueStatus::Overdue);
    }

    #[test]
    fn test_two_days_ahead_is_active() {
        assert_eq!(classify(now() + TimeDelta::hours(48), now()), DueStatus::Active);
    }

    #[test]
    fn test_boundaries() {
        // 恰好到期尚未逾期
        assert_eq!(classify(now(), now()), DueStatus::DueSoon);
        // 窗口右端为开区间
        assert_eq!(
            classify(now() + TimeDelta::hours(DUE_SOON_HOURS), now()),
            DueStatus::Active
        );
        assert_eq!(
            classify(
                now() + TimeDelta::hours(DUE_SOON_HOURS) - TimeDelta::milliseconds(1),
                now()
            ),
            DueStatus::DueSoon
        );
    }

    #[test]
    fn test_classification_matches_rule_over_a_sweep() {
        let n = now();
        for minutes in (-3 * 24 * 60..=3 * 24 * 60).step_by(37) {
            let due = n + TimeDelta::minutes(minutes);
            let expected = if due < n {
                DueStatus::Overdue
            } else if due < n + TimeDelta::hours(24) {
                DueStatus::DueSoon
            } else {
                DueStatus::Active
            };
            assert_eq!(classify(due, n), expected, "offset {minutes} min");
        }
    }

    #[test]
    fn test_labels_and_wire_names() {
        assert_eq!(DueStatus::DueSoon.label(), "Due Soon");
        assert_eq!(DueStatus::Overdue.to_string(), "Overdue");
        assert_eq!(
            serde_json::to_string(&DueStatus::DueSoon).unwrap(),
            "\"due_soon\""
        );
    }
}
