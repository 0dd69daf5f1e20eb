//! 从存储中补齐关联记录，再交给领域层投影成列表行

use std::sync::Arc;

use chrono::Utc;

use crate::domain::projection::{
    AssignmentRow, Lookup, SubmissionRow, project_assignment, project_submission,
};
use crate::errors::Result;
use crate::models::{assignments::Assignment, submissions::Submission};
use crate::storage::Storage;

pub(crate) fn unique_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// 投影作业行，提交数按作业统计
pub(crate) async fn assignment_rows(
    storage: &Arc<dyn Storage>,
    assignments: &[Assignment],
) -> Result<Vec<AssignmentRow>> {
    let class_ids = unique_ids(assignments.iter().map(|a| a.class_id));
    let teacher_ids = unique_ids(assignments.iter().map(|a| a.teacher_id));
    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();

    let classes = storage.list_classes_by_ids(&class_ids).await?;
    let teachers = storage.list_users_by_ids(&teacher_ids).await?;
    let submissions = storage.list_submissions_by_assignments(&assignment_ids).await?;

    Ok(Lookup::new(&[], &classes, &teachers).assignments(assignments, &submissions, Utc::now()))
}

/// 投影单个作业
pub(crate) async fn assignment_row(
    storage: &Arc<dyn Storage>,
    assignment: &Assignment,
) -> Result<AssignmentRow> {
    let class = storage.get_class_by_id(assignment.class_id).await?;
    let teacher = storage.get_user_by_id(assignment.teacher_id).await?;
    let count = storage.count_submissions_by_assignment(assignment.id).await?;

    Ok(project_assignment(
        assignment,
        class.as_ref(),
        teacher.as_ref(),
        count as i64,
        Utc::now(),
    ))
}

/// 投影单个提交
pub(crate) async fn submission_row(
    storage: &Arc<dyn Storage>,
    submission: &Submission,
) -> Result<SubmissionRow> {
    let assignment = storage.get_assignment_by_id(submission.assignment_id).await?;
    let class = match &assignment {
        Some(a) => storage.get_class_by_id(a.class_id).await?,
        None => None,
    };
    let student = storage.get_user_by_id(submission.student_id).await?;

    Ok(project_submission(
        submission,
        assignment.as_ref(),
        class.as_ref(),
        student.as_ref(),
    ))
}

/// 投影提交行，保持输入顺序
pub(crate) async fn submission_rows(
    storage: &Arc<dyn Storage>,
    submissions: &[Submission],
) -> Result<Vec<SubmissionRow>> {
    let assignment_ids = unique_ids(submissions.iter().map(|s| s.assignment_id));
    let student_ids = unique_ids(submissions.iter().map(|s| s.student_id));

    let assignments = storage.list_assignments_by_ids(&assignment_ids).await?;
    let class_ids = unique_ids(assignments.iter().map(|a| a.class_id));
    let classes = storage.list_classes_by_ids(&class_ids).await?;
    let students = storage.list_users_by_ids(&student_ids).await?;

    Ok(Lookup::new(&assignments, &classes, &students).submissions(submissions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        assignments::requests::NewAssignment,
        classes::requests::NewClass,
        submissions::{SubmissionStatus, requests::SubmissionUpsert},
        users::{UserRole, requests::CreateUserRequest},
    };
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[test]
    fn test_unique_ids_sorted() {
        assert_eq!(unique_ids([3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(unique_ids([]).is_empty());
    }

    #[tokio::test]
    async fn test_rows_resolve_names() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let teacher = storage
            .create_user(CreateUserRequest {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "x".into(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap();
        let student = storage
            .create_user(CreateUserRequest {
                name: "Ben".into(),
                email: "ben@example.com".into(),
                password: "x".into(),
                role: UserRole::Student,
            })
            .await
            .unwrap();
        let class = storage
            .create_class(NewClass {
                teacher_id: teacher.id,
                title: "Physics".into(),
                code: "PHY-101".into(),
                description: None,
                subject: None,
            })
            .await
            .unwrap();
        let due = Utc::now() + chrono::TimeDelta::days(3);
        let assignment = storage
            .create_assignment(NewAssignment {
                class_id: class.id,
                teacher_id: teacher.id,
                title: "Lab report".into(),
                description: None,
                due_at: due,
                max_score: 20.0,
            })
            .await
            .unwrap();
        let submission = storage
            .upsert_submission(SubmissionUpsert {
                assignment_id: assignment.id,
                student_id: student.id,
                content: "done".into(),
                status: SubmissionStatus::Submitted,
                submitted_at: Utc::now(),
            })
            .await
            .unwrap();

        let rows = assignment_rows(&storage, std::slice::from_ref(&assignment))
            .await
            .unwrap();
        assert_eq!(rows[0].class_name, "Physics");
        assert_eq!(rows[0].teacher_name, "Ada");
        assert_eq!(rows[0].submission_count, 1);

        let single = assignment_row(&storage, &assignment).await.unwrap();
        assert_eq!(single, rows[0]);

        let rows = submission_rows(&storage, std::slice::from_ref(&submission))
            .await
            .unwrap();
        assert_eq!(rows[0].assignment_title, "Lab report");
        assert_eq!(rows[0].class_name, "Physics");
        assert_eq!(rows[0].student_name, "Ben");
        assert_eq!(rows[0].max_score, 20.0);
        assert_eq!(rows[0].score_display, "-");
        assert_eq!(submission_row(&storage, &submission).await.unwrap(), rows[0]);
    }
}
