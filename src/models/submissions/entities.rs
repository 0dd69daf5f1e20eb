use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 提交状态（持久化）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
    Late,
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const GRADED: &'static str = "graded";
    pub const LATE: &'static str = "late";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => Self::SUBMITTED,
            SubmissionStatus::Graded => Self::GRADED,
            SubmissionStatus::Late => Self::LATE,
        }
    }

    /// 按提交时间与截止时间判定首次状态
    pub fn on_submit(
        submitted_at: chrono::DateTime<chrono::Utc>,
        due_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        if submitted_at > due_at {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        }
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SUBMITTED => Ok(SubmissionStatus::Submitted),
            Self::GRADED => Ok(SubmissionStatus::Graded),
            Self::LATE => Ok(SubmissionStatus::Late),
            _ => Err(format!(
                "Invalid submission status: '{s}'. Supported: submitted, graded, late"
            )),
        }
    }
}

/// 评分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct Grade {
    pub score: f64,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    pub status: SubmissionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub grade: Option<Grade>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.status == SubmissionStatus::Graded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_on_submit_before_due_is_submitted() {
        let due = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let at = due - chrono::TimeDelta::minutes(1);
        assert_eq!(SubmissionStatus::on_submit(at, due), SubmissionStatus::Submitted);
    }

    #[test]
    fn test_on_submit_exactly_at_due_is_not_late() {
        let due = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(SubmissionStatus::on_submit(due, due), SubmissionStatus::Submitted);
    }

    #[test]
    fn test_on_submit_after_due_is_late() {
        let due = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let at = due + chrono::TimeDelta::seconds(1);
        assert_eq!(SubmissionStatus::on_submit(at, due), SubmissionStatus::Late);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("late".parse::<SubmissionStatus>(), Ok(SubmissionStatus::Late));
        assert!("pending".parse::<SubmissionStatus>().is_err());
        assert_eq!(
            serde_json::from_str::<SubmissionStatus>("\"graded\"").unwrap(),
            SubmissionStatus::Graded
        );
    }
}
