use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, http::StatusCode, test, web};
use chrono::{TimeZone, Utc};

use super::AssignmentService;
use crate::models::{
    ErrorCode,
    assignments::requests::{AssignmentListParams, NewAssignment, UpdateAssignmentRequest},
    classes::requests::NewClass,
    submissions::requests::{GradeInput, SubmitAssignmentRequest},
    users::{User, UserRole, requests::CreateUserRequest},
};
use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};

struct School {
    storage: Arc<dyn Storage>,
    teacher: User,
    student: User,
    outsider: User,
    admin: User,
    assignment_id: i64,
}

async fn add_user(storage: &Arc<dyn Storage>, name: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            name: name.to_string(),
            email: format!("{}@school.test", name.to_lowercase()),
            password: "hash".to_string(),
            role,
        })
        .await
        .unwrap()
}

async fn add_class_with_assignment(
    storage: &Arc<dyn Storage>,
    teacher: &User,
    code: &str,
    title: &str,
) -> (i64, i64) {
    let class = storage
        .create_class(NewClass {
            teacher_id: teacher.id,
            title: format!("{title} class"),
            code: code.to_string(),
            description: None,
            subject: None,
        })
        .await
        .unwrap();
    let assignment = storage
        .create_assignment(NewAssignment {
            class_id: class.id,
            teacher_id: teacher.id,
            title: title.to_string(),
            description: None,
            due_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            max_score: 20.0,
        })
        .await
        .unwrap();
    (class.id, assignment.id)
}

async fn school() -> School {
    let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
    let teacher = add_user(&storage, "Teacher", UserRole::Teacher).await;
    let student = add_user(&storage, "Student", UserRole::Student).await;
    let outsider = add_user(&storage, "Outsider", UserRole::Student).await;
    let admin = add_user(&storage, "Admin", UserRole::Admin).await;
    let (class_id, assignment_id) =
        add_class_with_assignment(&storage, &teacher, "ALG-1", "Algebra").await;
    storage.enroll_student(class_id, student.id).await.unwrap();

    School {
        storage,
        teacher,
        student,
        outsider,
        admin,
        assignment_id,
    }
}

fn request_as(storage: &Arc<dyn Storage>, user: &User) -> HttpRequest {
    let req = test::TestRequest::default()
        .app_data(web::Data::new(storage.clone()))
        .to_http_request();
    req.extensions_mut().insert(user.clone());
    req
}

async fn body_json(resp: HttpResponse) -> serde_json::Value {
    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn submit(content: &str) -> SubmitAssignmentRequest {
    SubmitAssignmentRequest {
        content: content.to_string(),
    }
}

fn due_change(due_at: chrono::DateTime<Utc>) -> UpdateAssignmentRequest {
    UpdateAssignmentRequest {
        title: None,
        description: None,
        due_at: Some(due_at),
        max_score: None,
    }
}

#[actix_web::test]
async fn test_submit_then_resubmit_until_graded() {
    let s = school().await;
    let service = AssignmentService::new_lazy();
    let req = request_as(&s.storage, &s.student);

    let first = service.submit(&req, s.assignment_id, submit("v1")).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    let body = body_json(first).await;
    assert_eq!(body["data"]["status"], "submitted");
    let submission_id = body["data"]["id"].as_i64().unwrap();

    let second = service.submit(&req, s.assignment_id, submit("v2")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let body = body_json(second).await;
    assert_eq!(body["data"]["id"].as_i64().unwrap(), submission_id);

    s.storage
        .grade_submission(
            submission_id,
            GradeInput {
                score: 18.0,
                feedback: None,
                graded_by: s.teacher.id,
            },
        )
        .await
        .unwrap();

    let third = service.submit(&req, s.assignment_id, submit("v3")).await.unwrap();
    assert_eq!(third.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(third).await["code"],
        ErrorCode::SubmissionAlreadyGraded.as_i32()
    );

    let stored = s.storage.get_submission_by_id(submission_id).await.unwrap().unwrap();
    assert_eq!(stored.content, "v2");
}

#[actix_web::test]
async fn test_submit_requires_enrollment_and_content() {
    let s = school().await;
    let service = AssignmentService::new_lazy();

    let outsider = request_as(&s.storage, &s.outsider);
    let resp = service.submit(&outsider, s.assignment_id, submit("hi")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let student = request_as(&s.storage, &s.student);
    let resp = service.submit(&student, s.assignment_id, submit("   ")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_due_date_locked_after_first_submission() {
    let s = school().await;
    let service = AssignmentService::new_lazy();
    let teacher = request_as(&s.storage, &s.teacher);

    // 尚无提交时可以修改
    let moved = Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap();
    let resp = service
        .update_assignment(&teacher, s.assignment_id, due_change(moved))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let student = request_as(&s.storage, &s.student);
    let resp = service.submit(&student, s.assignment_id, submit("done")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let later = Utc.with_ymd_and_hms(2030, 3, 1, 0, 0, 0).unwrap();
    let resp = service
        .update_assignment(&teacher, s.assignment_id, due_change(later))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(resp).await["code"],
        ErrorCode::AssignmentDueDateLocked.as_i32()
    );

    let current = s
        .storage
        .get_assignment_by_id(s.assignment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.due_at, moved);
    let resp = service
        .update_assignment(&teacher, s.assignment_id, due_change(current.due_at))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_assignment_list_is_scoped_by_role() {
    let s = school().await;
    let other_teacher = add_user(&s.storage, "Other", UserRole::Teacher).await;
    let (other_class, _) =
        add_class_with_assignment(&s.storage, &other_teacher, "BIO-1", "Biology").await;
    let service = AssignmentService::new_lazy();

    let titles = |body: serde_json::Value| -> Vec<String> {
        body["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["title"].as_str().unwrap().to_string())
            .collect()
    };
    let params = |class_id: Option<i64>| AssignmentListParams {
        class_id,
        search: None,
    };

    let cases = [
        (&s.admin, None, vec!["Algebra", "Biology"]),
        (&s.teacher, None, vec!["Algebra"]),
        (&other_teacher, None, vec!["Biology"]),
        (&s.student, None, vec!["Algebra"]),
        (&s.outsider, None, vec![]),
        // 指定不可见的班级时结果为空
        (&s.teacher, Some(other_class), vec![]),
    ];

    for (user, class_id, expected) in cases {
        let req = request_as(&s.storage, user);
        let resp = service.list_assignments(&req, params(class_id)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let mut got = titles(body_json(resp).await);
        got.sort();
        assert_eq!(got, expected, "user {}", user.name);
    }
}
