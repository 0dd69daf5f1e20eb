use chrono::{Duration, TimeZone, Utc};

use super::SeaOrmStorage;
use crate::models::{
    assignments::requests::{AssignmentUpdate, NewAssignment},
    classes::requests::{ClassListQuery, NewClass, UpdateClassRequest},
    submissions::{
        SubmissionStatus,
        requests::{GradeInput, SubmissionUpsert},
    },
    users::{
        UserRole,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::in_memory().await.unwrap()
}

async fn add_user(s: &SeaOrmStorage, name: &str, email: &str, role: UserRole) -> i64 {
    s.create_user(CreateUserRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: "hash".to_string(),
        role,
    })
    .await
    .unwrap()
    .id
}

async fn add_class(s: &SeaOrmStorage, teacher_id: i64, title: &str, code: &str) -> i64 {
    s.create_class(NewClass {
        teacher_id,
        title: title.to_string(),
        code: code.to_string(),
        description: None,
        subject: Some("Math".to_string()),
    })
    .await
    .unwrap()
    .id
}

async fn add_assignment(s: &SeaOrmStorage, class_id: i64, teacher_id: i64) -> i64 {
    s.create_assignment(NewAssignment {
        class_id,
        teacher_id,
        title: "Worksheet".to_string(),
        description: None,
        due_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        max_score: 50.0,
    })
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn test_user_email_is_case_insensitive_and_unique() {
    let s = storage().await;
    add_user(&s, "Ada", "Ada@School.TEST", UserRole::Teacher).await;

    let found = s.get_user_by_email("ada@school.test").await.unwrap();
    assert_eq!(found.map(|u| u.email), Some("ada@school.test".to_string()));

    let dup = s
        .create_user(CreateUserRequest {
            name: "Other".into(),
            email: "ADA@school.test".into(),
            password: "x".into(),
            role: UserRole::Student,
        })
        .await
        .unwrap_err();
    assert!(dup.is_unique_violation());
}

#[tokio::test]
async fn test_user_listing_filters_and_paginates() {
    let s = storage().await;
    add_user(&s, "Grace Hopper", "grace@school.test", UserRole::Teacher).await;
    for i in 0..3 {
        add_user(&s, &format!("Student {i}"), &format!("s{i}@school.test"), UserRole::Student).await;
    }

    let students = s
        .list_users_with_pagination(UserListQuery {
            page: 1,
            size: 2,
            role: Some(UserRole::Student),
        })
        .await
        .unwrap();
    assert_eq!(students.items.len(), 2);
    assert_eq!(students.pagination.total, 3);
    assert_eq!(students.pagination.total_pages, 2);

    assert_eq!(s.count_users_by_role(UserRole::Student).await.unwrap(), 3);
}

#[tokio::test]
async fn test_partial_user_update() {
    let s = storage().await;
    let id = add_user(&s, "Old Name", "old@school.test", UserRole::Student).await;

    let updated = s
        .update_user(
            id,
            UpdateUserRequest {
                name: Some("New Name".into()),
                email: None,
                password: None,
                role: Some(UserRole::Teacher),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.email, "old@school.test");
    assert_eq!(updated.role, UserRole::Teacher);

    assert!(
        s.update_user(9999, UpdateUserRequest { name: None, email: None, password: None, role: None })
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_enrollment_and_class_scoping() {
    let s = storage().await;
    let teacher = add_user(&s, "T", "t@school.test", UserRole::Teacher).await;
    let other_teacher = add_user(&s, "T2", "t2@school.test", UserRole::Teacher).await;
    let student = add_user(&s, "S", "s@school.test", UserRole::Student).await;
    let algebra = add_class(&s, teacher, "Algebra", "ALG-1").await;
    add_class(&s, other_teacher, "Biology", "BIO-1").await;

    assert!(s.enroll_student(algebra, student).await.unwrap());
    assert!(!s.enroll_student(algebra, student).await.unwrap());

    let class = s.get_class_by_code("ALG-1").await.unwrap().unwrap();
    assert_eq!(class.student_ids, vec![student]);

    let mine = s.list_classes_by_student(student).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, algebra);

    let teacher_page = s
        .list_classes_with_pagination(ClassListQuery {
            page: 1,
            size: 20,
            teacher_id: Some(other_teacher),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(teacher_page.items.len(), 1);
    assert_eq!(teacher_page.items[0].title, "Biology");

    let lonely = add_user(&s, "L", "l@school.test", UserRole::Student).await;
    let none = s
        .list_classes_with_pagination(ClassListQuery {
            page: 1,
            size: 20,
            student_id: Some(lonely),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(none.items.is_empty());

    assert!(s.remove_student(algebra, student).await.unwrap());
    assert!(!s.remove_student(algebra, student).await.unwrap());
}

#[tokio::test]
async fn test_class_update_and_duplicate_code() {
    let s = storage().await;
    let teacher = add_user(&s, "T", "t@school.test", UserRole::Teacher).await;
    let first = add_class(&s, teacher, "First", "CODE-1").await;
    add_class(&s, teacher, "Second", "CODE-2").await;

    let err = s
        .update_class(
            first,
            UpdateClassRequest {
                title: None,
                code: Some("CODE-2".into()),
                description: None,
                subject: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    let renamed = s
        .update_class(
            first,
            UpdateClassRequest {
                title: Some("Renamed".into()),
                code: None,
                description: Some("desc".into()),
                subject: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.title, "Renamed");
    assert_eq!(renamed.code, "CODE-1");
    assert_eq!(renamed.description.as_deref(), Some("desc"));
}

#[tokio::test]
async fn test_resubmission_replaces_single_row() {
    let s = storage().await;
    let teacher = add_user(&s, "T", "t@school.test", UserRole::Teacher).await;
    let student = add_user(&s, "S", "s@school.test", UserRole::Student).await;
    let class = add_class(&s, teacher, "Algebra", "ALG-1").await;
    let assignment = add_assignment(&s, class, teacher).await;

    let at = Utc.with_ymd_and_hms(2029, 12, 1, 0, 0, 0).unwrap();
    let first = s
        .upsert_submission(SubmissionUpsert {
            assignment_id: assignment,
            student_id: student,
            content: "draft".into(),
            status: SubmissionStatus::Submitted,
            submitted_at: at,
        })
        .await
        .unwrap();
    let second = s
        .upsert_submission(SubmissionUpsert {
            assignment_id: assignment,
            student_id: student,
            content: "final".into(),
            status: SubmissionStatus::Late,
            submitted_at: at + Duration::days(60),
        })
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.content, "final");
    assert_eq!(second.status, SubmissionStatus::Late);
    assert_eq!(s.count_submissions_by_assignment(assignment).await.unwrap(), 1);
}

#[tokio::test]
async fn test_grading_sets_status_and_grade() {
    let s = storage().await;
    let teacher = add_user(&s, "T", "t@school.test", UserRole::Teacher).await;
    let student = add_user(&s, "S", "s@school.test", UserRole::Student).await;
    let class = add_class(&s, teacher, "Algebra", "ALG-1").await;
    let assignment = add_assignment(&s, class, teacher).await;
    let submission = s
        .upsert_submission(SubmissionUpsert {
            assignment_id: assignment,
            student_id: student,
            content: "answer".into(),
            status: SubmissionStatus::Submitted,
            submitted_at: Utc::now(),
        })
        .await
        .unwrap();

    let graded = s
        .grade_submission(
            submission.id,
            GradeInput {
                score: 42.5,
                feedback: Some("Good".into()),
                graded_by: teacher,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);
    let grade = graded.grade.unwrap();
    assert_eq!(grade.score, 42.5);
    assert_eq!(grade.feedback.as_deref(), Some("Good"));
    assert_eq!(grade.graded_by, Some(teacher));

    assert!(
        s.grade_submission(
            9999,
            GradeInput {
                score: 1.0,
                feedback: None,
                graded_by: teacher,
            },
        )
        .await
        .unwrap()
        .is_none()
    );
}

#[tokio::test]
async fn test_class_delete_cascades() {
    let s = storage().await;
    let teacher = add_user(&s, "T", "t@school.test", UserRole::Teacher).await;
    let student = add_user(&s, "S", "s@school.test", UserRole::Student).await;
    let class = add_class(&s, teacher, "Algebra", "ALG-1").await;
    s.enroll_student(class, student).await.unwrap();
    let assignment = add_assignment(&s, class, teacher).await;
    s.upsert_submission(SubmissionUpsert {
        assignment_id: assignment,
        student_id: student,
        content: "x".into(),
        status: SubmissionStatus::Submitted,
        submitted_at: Utc::now(),
    })
    .await
    .unwrap();

    assert!(s.delete_class(class).await.unwrap());
    assert!(s.get_assignment_by_id(assignment).await.unwrap().is_none());
    assert!(s.list_all_submissions().await.unwrap().is_empty());
    assert!(s.list_classes_by_student(student).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_assignment_update_is_partial() {
    let s = storage().await;
    let teacher = add_user(&s, "T", "t@school.test", UserRole::Teacher).await;
    let class = add_class(&s, teacher, "Algebra", "ALG-1").await;
    let id = add_assignment(&s, class, teacher).await;

    let updated = s
        .update_assignment(
            id,
            AssignmentUpdate {
                title: Some("Quiz 2".into()),
                max_score: Some(20.0),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Quiz 2");
    assert_eq!(updated.max_score, 20.0);
    assert_eq!(
        updated.due_at,
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    );

    let by_class = s.list_assignments_by_classes(&[class]).await.unwrap();
    assert_eq!(by_class.len(), 1);
    assert!(s.delete_assignment(id).await.unwrap());
    assert!(!s.delete_assignment(id).await.unwrap());
}
