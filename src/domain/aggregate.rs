//! 仪表盘统计
//!
//! 输入为实体快照，输出为可直接序列化的分组计数。

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::projection::SubmissionRow;
use crate::models::{
    assignments::Assignment,
    classes::Class,
    submissions::{Submission, SubmissionStatus},
    users::{User, UserRole},
};

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct RoleCount {
    pub role: UserRole,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct ClassEnrollment {
    pub class_id: i64,
    pub title: String,
    pub student_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct AssignmentSubmissionCount {
    pub assignment_id: i64,
    pub assignment_title: String,
    pub submission_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/analytics.ts")]
pub struct DashboardTotals {
    pub total_users: i64,
    pub total_students: i64,
    pub total_teachers: i64,
    pub total_admins: i64,
    pub total_classes: i64,
    pub total_assignments: i64,
    pub total_submissions: i64,
}

/// 提交统计：待批改只计 `submitted`，迟交单独计数
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct SubmissionTally {
    pub total: i64,
    pub pending: i64,
    pub graded: i64,
    pub late: i64,
}

impl SubmissionTally {
    pub fn record(&mut self, status: SubmissionStatus) {
        self.total += 1;
        match status {
            SubmissionStatus::Submitted => self.pending += 1,
            SubmissionStatus::Graded => self.graded += 1,
            SubmissionStatus::Late => self.late += 1,
        }
    }
}

/// 按角色计数，顺序为角色在输入中首次出现的顺序
pub fn count_by_role(users: &[User]) -> Vec<RoleCount> {
    let mut counts: Vec<RoleCount> = Vec::new();
    for user in users {
        match counts.iter_mut().find(|c| c.role == user.role) {
            Some(entry) => entry.count += 1,
            None => counts.push(RoleCount {
                role: user.role,
                count: 1,
            }),
        }
    }
    counts
}

/// 按创建年月计数，按时间升序
pub fn count_by_month<I>(timestamps: I) -> Vec<MonthCount>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut buckets: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for ts in timestamps {
        *buckets.entry((ts.year(), ts.month())).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|((year, month), count)| MonthCount { year, month, count })
        .collect()
}

pub fn users_by_month(users: &[User]) -> Vec<MonthCount> {
    count_by_month(users.iter().map(|u| u.created_at))
}

pub fn classes_by_month(classes: &[Class]) -> Vec<MonthCount> {
    count_by_month(classes.iter().map(|c| c.created_at))
}

pub fn assignments_by_month(assignments: &[Assignment]) -> Vec<MonthCount> {
    count_by_month(assignments.iter().map(|a| a.created_at))
}

/// 每个班级的学生人数，保持输入顺序
pub fn class_enrollment(classes: &[Class]) -> Vec<ClassEnrollment> {
    classes
        .iter()
        .map(|c| ClassEnrollment {
            class_id: c.id,
            title: c.title.clone(),
            student_count: c.student_count(),
            created_at: c.created_at,
        })
        .collect()
}

/// 每个作业的提交数，没有提交的作业计为 0
pub fn submissions_by_assignment(
    assignments: &[Assignment],
    submissions: &[Submission],
) -> Vec<AssignmentSubmissionCount> {
    let mut counts: HashMap<i64, i64> = HashMap::new();
    for s in submissions {
        *counts.entry(s.assignment_id).or_default() += 1;
    }
    assignments
        .iter()
        .map(|a| AssignmentSubmissionCount {
            assignment_id: a.id,
            assignment_title: a.title.clone(),
            submission_count: counts.get(&a.id).copied().unwrap_or(0),
        })
        .collect()
}

pub fn dashboard_totals(
    users: &[User],
    classes: &[Class],
    assignments: &[Assignment],
    submissions: &[Submission],
) -> DashboardTotals {
    let mut totals = DashboardTotals {
        total_users: users.len() as i64,
        total_classes: classes.len() as i64,
        total_assignments: assignments.len() as i64,
        total_submissions: submissions.len() as i64,
        ..Default::default()
    };
    for user in users {
        match user.role {
            UserRole::Student => totals.total_students += 1,
            UserRole::Teacher => totals.total_teachers += 1,
            UserRole::Admin => totals.total_admins += 1,
        }
    }
    totals
}

pub fn submission_tally(rows: &[SubmissionRow]) -> SubmissionTally {
    let mut tally = SubmissionTally::default();
    for row in rows {
        tally.record(row.status);
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::Lookup;
    use crate::domain::projection::fixtures::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap()
    }

    fn people() -> Vec<User> {
        vec![
            user(1, "T One", UserRole::Teacher, at(2025, 2, 3)),
            user(2, "S One", UserRole::Student, at(2024, 12, 30)),
            user(3, "A One", UserRole::Admin, at(2025, 2, 14)),
            user(4, "S Two", UserRole::Student, at(2025, 1, 1)),
            user(5, "S Three", UserRole::Student, at(2025, 2, 28)),
        ]
    }

    #[test]
    fn test_role_counts_follow_discovery_order() {
        let counts = count_by_role(&people());
        assert_eq!(
            counts,
            vec![
                RoleCount { role: UserRole::Teacher, count: 1 },
                RoleCount { role: UserRole::Student, count: 3 },
                RoleCount { role: UserRole::Admin, count: 1 },
            ]
        );
    }

    #[test]
    fn test_role_counts_sum_to_total() {
        let users = people();
        let sum: i64 = count_by_role(&users).iter().map(|c| c.count).sum();
        assert_eq!(sum, users.len() as i64);
        assert!(count_by_role(&[]).is_empty());
    }

    #[test]
    fn test_month_counts_are_chronological() {
        let counts = users_by_month(&people());
        assert_eq!(
            counts,
            vec![
                MonthCount { year: 2024, month: 12, count: 1 },
                MonthCount { year: 2025, month: 1, count: 1 },
                MonthCount { year: 2025, month: 2, count: 3 },
            ]
        );
    }

    #[test]
    fn test_enrollment_and_zero_submission_assignments() {
        let classes = vec![class(1, "Algebra", 1, vec![2, 4, 5]), class(2, "Art", 1, vec![])];
        let enrollment = class_enrollment(&classes);
        assert_eq!(enrollment[0].student_count, 3);
        assert_eq!(enrollment[1].student_count, 0);
        assert_eq!(enrollment[1].title, "Art");

        let assignments = vec![
            assignment(10, 1, "Quiz", ts(10, 0)),
            assignment(11, 2, "Sketch", ts(10, 0)),
        ];
        let submissions = vec![
            submission(1, 10, 2, SubmissionStatus::Submitted, None),
            submission(2, 10, 4, SubmissionStatus::Late, None),
        ];
        let counts = submissions_by_assignment(&assignments, &submissions);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].submission_count, 2);
        assert_eq!(counts[1].assignment_title, "Sketch");
        assert_eq!(counts[1].submission_count, 0);
    }

    #[test]
    fn test_dashboard_totals() {
        let users = people();
        let classes = vec![class(1, "Algebra", 1, vec![2])];
        let assignments = vec![assignment(10, 1, "Quiz", ts(10, 0))];
        let submissions = vec![submission(1, 10, 2, SubmissionStatus::Graded, Some(9.0))];
        let totals = dashboard_totals(&users, &classes, &assignments, &submissions);
        assert_eq!(
            totals,
            DashboardTotals {
                total_users: 5,
                total_students: 3,
                total_teachers: 1,
                total_admins: 1,
                total_classes: 1,
                total_assignments: 1,
                total_submissions: 1,
            }
        );
    }

    #[test]
    fn test_submission_tally() {
        let assignments = vec![assignment(10, 1, "Quiz", ts(10, 0))];
        let submissions = vec![
            submission(1, 10, 2, SubmissionStatus::Submitted, None),
            submission(2, 10, 4, SubmissionStatus::Late, None),
            submission(3, 10, 5, SubmissionStatus::Graded, Some(3.0)),
            submission(4, 10, 6, SubmissionStatus::Submitted, None),
        ];
        let rows = Lookup::new(&assignments, &[], &[]).submissions(&submissions);
        assert_eq!(
            submission_tally(&rows),
            SubmissionTally {
                total: 4,
                pending: 2,
                graded: 1,
                late: 1,
            }
        );
        assert_eq!(submission_tally(&[]), SubmissionTally::default());
    }
}
