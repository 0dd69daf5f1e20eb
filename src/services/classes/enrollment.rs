//! 选课：学生凭加入码加入，管理者手动增删学生

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, class_row, load_managed_class};
use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::{AddStudentRequest, JoinClassRequest},
    users::UserRole,
};
use crate::services::{current_user, internal_error};

pub async fn join_class(
    service: &ClassService,
    request: &HttpRequest,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let code = join_data.code.trim();
    let class = match storage.get_class_by_code(code).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassCodeInvalid,
                "No class matches this code",
            )));
        }
        Err(e) => return Ok(internal_error("Failed to look up class code", e)),
    };

    if class.has_student(user.id) {
        return Ok(already_joined());
    }

    match storage.enroll_student(class.id, user.id).await {
        Ok(true) => {
            info!("Student {} joined class {}", user.id, class.id);
            let refreshed = match storage.get_class_by_id(class.id).await {
                Ok(Some(refreshed)) => refreshed,
                _ => class,
            };
            let row = class_row(&storage, &refreshed).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(row, "Joined class successfully")))
        }
        Ok(false) => Ok(already_joined()),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ClassJoinFailed,
            format!("Failed to join class: {e}"),
        ))),
    }
}

pub async fn add_student(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    data: AddStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let class = match load_managed_class(&storage, &user, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    match storage.get_user_by_id(data.student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Only students can be enrolled in a class",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "Student not found")));
        }
        Err(e) => return Ok(internal_error("Failed to load student", e)),
    }

    match storage.enroll_student(class.id, data.student_id).await {
        Ok(true) => {
            info!(
                "Student {} added to class {} by user {}",
                data.student_id, class.id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success_empty("Student added to class")))
        }
        Ok(false) => Ok(already_joined()),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ClassJoinFailed,
            format!("Failed to add student: {e}"),
        ))),
    }
}

pub async fn remove_student(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let class = match load_managed_class(&storage, &user, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    match storage.remove_student(class.id, student_id).await {
        Ok(true) => {
            info!(
                "Student {} removed from class {} by user {}",
                student_id, class.id, user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student removed from class")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassStudentNotFound,
            "Student is not enrolled in this class",
        ))),
        Err(e) => Ok(internal_error("Failed to remove student", e)),
    }
}

fn already_joined() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::ClassAlreadyJoined,
        "Student is already enrolled in this class",
    ))
}
