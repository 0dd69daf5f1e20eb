//! 展示行投影
//!
//! 将提交 / 作业 / 班级及其关联记录拍平为前端直接渲染的行。
//! 关联记录缺失时使用占位值，投影本身从不失败。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::status::{DueStatus, classify};
use crate::models::assignments::entities::DEFAULT_MAX_SCORE;
use crate::models::{
    assignments::Assignment,
    classes::Class,
    submissions::{Grade, Submission, SubmissionStatus},
    users::User,
};

pub const UNKNOWN_ASSIGNMENT: &str = "Unknown Assignment";
pub const UNKNOWN_CLASS: &str = "Unknown Class";
pub const UNKNOWN_STUDENT: &str = "Unknown Student";
pub const UNKNOWN_TEACHER: &str = "Unknown Teacher";
/// 未评分时的分数显示
pub const NO_SCORE: &str = "-";

/// 提交展示行
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/submission.ts")]
pub struct SubmissionRow {
    pub id: i64,
    pub assignment_id: i64,
    pub assignment_title: String,
    pub class_id: Option<i64>,
    pub class_name: String,
    pub due_at: Option<DateTime<Utc>>,
    pub max_score: f64,
    pub student_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub content: String,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<Grade>,
    pub score_display: String,
}

/// 作业展示行
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/assignment.ts")]
pub struct AssignmentRow {
    pub id: i64,
    pub class_id: i64,
    pub class_name: String,
    pub teacher_id: i64,
    pub teacher_name: String,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub max_score: f64,
    pub status: DueStatus,
    pub status_label: String,
    pub submission_count: i64,
    pub created_at: DateTime<Utc>,
}

/// 班级展示行
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../client/src/types/generated/class.ts")]
pub struct ClassRow {
    pub id: i64,
    pub title: String,
    pub code: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub teacher_id: i64,
    pub teacher_name: String,
    pub student_count: i64,
    pub created_at: DateTime<Utc>,
}

/// 分数显示：已评分为 `score/max`，否则为 `-`
///
/// 整数分省略小数部分（`85/100`），小数分保留有效位（`85.5/100`）。
pub fn format_score(status: SubmissionStatus, grade: Option<&Grade>, max_score: f64) -> String {
    match (status, grade) {
        (SubmissionStatus::Graded, Some(grade)) => format!("{}/{}", grade.score, max_score),
        _ => NO_SCORE.to_string(),
    }
}

pub fn project_submission(
    submission: &Submission,
    assignment: Option<&Assignment>,
    class: Option<&Class>,
    student: Option<&User>,
) -> SubmissionRow {
    let max_score = assignment.map_or(DEFAULT_MAX_SCORE, |a| a.max_score);

    SubmissionRow {
        id: submission.id,
        assignment_id: submission.assignment_id,
        assignment_title: assignment.map_or_else(|| UNKNOWN_ASSIGNMENT.to_string(), |a| a.title.clone()),
        class_id: class.map(|c| c.id).or(assignment.map(|a| a.class_id)),
        class_name: class.map_or_else(|| UNKNOWN_CLASS.to_string(), |c| c.title.clone()),
        due_at: assignment.map(|a| a.due_at),
        max_score,
        student_id: submission.student_id,
        student_name: student.map_or_else(|| UNKNOWN_STUDENT.to_string(), |u| u.name.clone()),
        student_email: student.map(|u| u.email.clone()).unwrap_or_default(),
        content: submission.content.clone(),
        status: submission.status,
        submitted_at: submission.submitted_at,
        grade: submission.grade.clone(),
        score_display: format_score(submission.status, submission.grade.as_ref(), max_score),
    }
}

pub fn project_assignment(
    assignment: &Assignment,
    class: Option<&Class>,
    teacher: Option<&User>,
    submission_count: i64,
    now: DateTime<Utc>,
) -> AssignmentRow {
    let status = classify(assignment.due_at, now);

    AssignmentRow {
        id: assignment.id,
        class_id: assignment.class_id,
        class_name: class.map_or_else(|| UNKNOWN_CLASS.to_string(), |c| c.title.clone()),
        teacher_id: assignment.teacher_id,
        teacher_name: teacher.map_or_else(|| UNKNOWN_TEACHER.to_string(), |u| u.name.clone()),
        title: assignment.title.clone(),
        description: assignment.description.clone(),
        due_at: assignment.due_at,
        max_score: assignment.max_score,
        status,
        status_label: status.label().to_string(),
        submission_count,
        created_at: assignment.created_at,
    }
}

pub fn project_class(class: &Class, teacher: Option<&User>) -> ClassRow {
    ClassRow {
        id: class.id,
        title: class.title.clone(),
        code: class.code.clone(),
        description: class.description.clone(),
        subject: class.subject.clone(),
        teacher_id: class.teacher_id,
        teacher_name: teacher.map_or_else(|| UNKNOWN_TEACHER.to_string(), |u| u.name.clone()),
        student_count: class.student_count(),
        created_at: class.created_at,
    }
}

/// 按 ID 索引的关联记录快照，用于批量投影
#[derive(Debug, Default)]
pub struct Lookup<'a> {
    assignments: HashMap<i64, &'a Assignment>,
    classes: HashMap<i64, &'a Class>,
    users: HashMap<i64, &'a User>,
}

impl<'a> Lookup<'a> {
    pub fn new(assignments: &'a [Assignment], classes: &'a [Class], users: &'a [User]) -> Self {
        Self {
            assignments: assignments.iter().map(|a| (a.id, a)).collect(),
            classes: classes.iter().map(|c| (c.id, c)).collect(),
            users: users.iter().map(|u| (u.id, u)).collect(),
        }
    }

    pub fn assignment(&self, id: i64) -> Option<&'a Assignment> {
        self.assignments.get(&id).copied()
    }

    pub fn class(&self, id: i64) -> Option<&'a Class> {
        self.classes.get(&id).copied()
    }

    pub fn user(&self, id: i64) -> Option<&'a User> {
        self.users.get(&id).copied()
    }

    /// 投影一批提交，保持输入顺序
    pub fn submissions(&self, submissions: &[Submission]) -> Vec<SubmissionRow> {
        submissions
            .iter()
            .map(|s| {
                let assignment = self.assignment(s.assignment_id);
                let class = assignment.and_then(|a| self.class(a.class_id));
                project_submission(s, assignment, class, self.user(s.student_id))
            })
            .collect()
    }

    /// 投影一批作业，提交数来自 `submissions`
    pub fn assignments(
        &self,
        assignments: &[Assignment],
        submissions: &[Submission],
        now: DateTime<Utc>,
    ) -> Vec<AssignmentRow> {
        let mut counts: HashMap<i64, i64> = HashMap::new();
        for s in submissions {
            *counts.entry(s.assignment_id).or_default() += 1;
        }
        assignments
            .iter()
            .map(|a| {
                project_assignment(
                    a,
                    self.class(a.class_id),
                    self.user(a.teacher_id),
                    counts.get(&a.id).copied().unwrap_or(0),
                    now,
                )
            })
            .collect()
    }

    pub fn classes(&self, classes: &[Class]) -> Vec<ClassRow> {
        classes
            .iter()
            .map(|c| project_class(c, self.user(c.teacher_id)))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::users::UserRole;
    use chrono::TimeZone;

    pub fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, day, hour, 0, 0).unwrap()
    }

    pub fn user(id: i64, name: &str, role: UserRole, created_at: DateTime<Utc>) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{}@school.test", name.to_lowercase().replace(' ', ".")),
            password_hash: String::new(),
            role,
            last_login: None,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn class(id: i64, title: &str, teacher_id: i64, student_ids: Vec<i64>) -> Class {
        Class {
            id,
            title: title.to_string(),
            code: format!("CODE{id}"),
            description: None,
            subject: Some("Science".to_string()),
            teacher_id,
            student_ids,
            created_at: ts(1, 8),
            updated_at: ts(1, 8),
        }
    }

    pub fn assignment(id: i64, class_id: i64, title: &str, due_at: DateTime<Utc>) -> Assignment {
        Assignment {
            id,
            class_id,
            teacher_id: 10,
            title: title.to_string(),
            description: None,
            due_at,
            max_score: 100.0,
            created_at: ts(2, 8),
            updated_at: ts(2, 8),
        }
    }

    pub fn submission(
        id: i64,
        assignment_id: i64,
        student_id: i64,
        status: SubmissionStatus,
        score: Option<f64>,
    ) -> Submission {
        Submission {
            id,
            assignment_id,
            student_id,
            content: format!("answer {id}"),
            status,
            submitted_at: ts(3, 12),
            grade: score.map(|score| Grade {
                score,
                feedback: None,
                graded_by: Some(10),
                graded_at: ts(4, 12),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::users::UserRole;

    #[test]
    fn test_ungraded_submission_shows_dash() {
        let s = submission(1, 1, 2, SubmissionStatus::Submitted, None);
        let row = project_submission(&s, None, None, None);
        assert_eq!(row.score_display, "-");
    }

    #[test]
    fn test_whole_score_has_no_fraction() {
        let a = assignment(1, 1, "Essay", ts(10, 0));
        let s = submission(1, 1, 2, SubmissionStatus::Graded, Some(85.0));
        let row = project_submission(&s, Some(&a), None, None);
        assert_eq!(row.score_display, "85/100");
    }

    #[test]
    fn test_fractional_score_is_trimmed() {
        let mut a = assignment(1, 1, "Lab", ts(10, 0));
        a.max_score = 50.0;
        let s = submission(1, 1, 2, SubmissionStatus::Graded, Some(42.5));
        let row = project_submission(&s, Some(&a), None, None);
        assert_eq!(row.score_display, "42.5/50");
    }

    #[test]
    fn test_grade_without_graded_status_shows_dash() {
        let s = submission(1, 1, 2, SubmissionStatus::Submitted, Some(70.0));
        assert_eq!(project_submission(&s, None, None, None).score_display, "-");
    }

    #[test]
    fn test_missing_joins_fall_back_to_placeholders() {
        let s = submission(7, 3, 4, SubmissionStatus::Graded, Some(90.0));
        let row = project_submission(&s, None, None, None);
        assert_eq!(row.assignment_title, UNKNOWN_ASSIGNMENT);
        assert_eq!(row.class_name, UNKNOWN_CLASS);
        assert_eq!(row.student_name, UNKNOWN_STUDENT);
        assert_eq!(row.student_email, "");
        assert_eq!(row.due_at, None);
        assert_eq!(row.class_id, None);
        // 无作业时满分按 100 计
        assert_eq!(row.score_display, "90/100");
    }

    #[test]
    fn test_full_join_copies_fields() {
        let student = user(4, "Grace Hopper", UserRole::Student, ts(1, 0));
        let c = class(2, "Physics", 10, vec![4]);
        let a = assignment(3, 2, "Momentum", ts(12, 9));
        let s = submission(7, 3, 4, SubmissionStatus::Late, None);
        let row = project_submission(&s, Some(&a), Some(&c), Some(&student));
        assert_eq!(row.assignment_title, "Momentum");
        assert_eq!(row.class_id, Some(2));
        assert_eq!(row.class_name, "Physics");
        assert_eq!(row.due_at, Some(ts(12, 9)));
        assert_eq!(row.student_name, "Grace Hopper");
        assert_eq!(row.student_email, "grace.hopper@school.test");
        assert_eq!(row.status, SubmissionStatus::Late);
    }

    #[test]
    fn test_assignment_row_carries_status_and_count() {
        let teacher = user(10, "Mr Smith", UserRole::Teacher, ts(1, 0));
        let c = class(2, "Physics", 10, vec![]);
        let a = assignment(3, 2, "Momentum", ts(12, 9));
        let row = project_assignment(&a, Some(&c), Some(&teacher), 4, ts(12, 1));
        assert_eq!(row.status, DueStatus::DueSoon);
        assert_eq!(row.status_label, "Due Soon");
        assert_eq!(row.submission_count, 4);
        assert_eq!(row.class_name, "Physics");
        assert_eq!(row.teacher_name, "Mr Smith");

        let orphan = project_assignment(&a, None, None, 0, ts(20, 0));
        assert_eq!(orphan.class_name, UNKNOWN_CLASS);
        assert_eq!(orphan.teacher_name, UNKNOWN_TEACHER);
        assert_eq!(orphan.status, DueStatus::Overdue);
    }

    #[test]
    fn test_lookup_projects_in_input_order() {
        let users = vec![
            user(10, "Mr Smith", UserRole::Teacher, ts(1, 0)),
            user(4, "Ann", UserRole::Student, ts(1, 0)),
        ];
        let classes = vec![class(2, "Physics", 10, vec![4])];
        let assignments = vec![
            assignment(3, 2, "Momentum", ts(12, 9)),
            assignment(5, 2, "Energy", ts(20, 9)),
        ];
        let submissions = vec![
            submission(9, 5, 4, SubmissionStatus::Submitted, None),
            submission(8, 3, 4, SubmissionStatus::Graded, Some(77.0)),
            submission(6, 3, 99, SubmissionStatus::Submitted, None),
        ];
        let lookup = Lookup::new(&assignments, &classes, &users);

        let rows = lookup.submissions(&submissions);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![9, 8, 6]);
        assert_eq!(rows[0].assignment_title, "Energy");
        assert_eq!(rows[1].score_display, "77/100");
        assert_eq!(rows[2].student_name, UNKNOWN_STUDENT);
        assert!(rows.iter().all(|r| r.class_name == "Physics"));

        let arows = lookup.assignments(&assignments, &submissions, ts(1, 0));
        assert_eq!(arows[0].submission_count, 2);
        assert_eq!(arows[1].submission_count, 1);

        let crows = lookup.classes(&classes);
        assert_eq!(crows[0].teacher_name, "Mr Smith");
        assert_eq!(crows[0].student_count, 1);
    }
}
