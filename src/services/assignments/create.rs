use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, validate_max_score};
use crate::models::assignments::{
    entities::DEFAULT_MAX_SCORE,
    requests::{CreateAssignmentRequest, NewAssignment},
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::classes::load_managed_class;
use crate::services::{current_user, internal_error, rows::assignment_row};
use crate::utils::validate::validate_title;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    data: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_title(&data.title) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    let max_score = data.max_score.unwrap_or(DEFAULT_MAX_SCORE);
    if let Err(msg) = validate_max_score(max_score) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    let class = match load_managed_class(&storage, &user, data.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    // 作业归属班级教师，管理员代建时也一样
    let new_assignment = NewAssignment {
        class_id: class.id,
        teacher_id: class.teacher_id,
        title: data.title.trim().to_string(),
        description: data.description,
        due_at: data.due_at,
        max_score,
    };

    let assignment = match storage.create_assignment(new_assignment).await {
        Ok(assignment) => assignment,
        Err(e) => return Ok(internal_error("Assignment creation failed", e)),
    };
    info!(
        "Assignment {} created in class {} by user {}",
        assignment.id, class.id, user.id
    );

    match assignment_row(&storage, &assignment).await {
        Ok(row) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(row, "Assignment created successfully"))),
        Err(e) => Ok(internal_error("Failed to load assignment details", e)),
    }
}
