use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, load_managed_assignment, validate_max_score};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::requests::{AssignmentUpdate, UpdateAssignmentRequest},
};
use crate::services::{current_user, internal_error, rows::assignment_row};
use crate::utils::validate::validate_title;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    data: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let (assignment, _) = match load_managed_assignment(&storage, &user, assignment_id).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };

    if let Some(title) = data.title.as_deref()
        && let Err(msg) = validate_title(title)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    if let Some(max_score) = data.max_score
        && let Err(msg) = validate_max_score(max_score)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    // 已有提交后截止时间不可再改
    if let Some(due_at) = data.due_at
        && due_at != assignment.due_at
    {
        match storage.count_submissions_by_assignment(assignment.id).await {
            Ok(0) => {}
            Ok(_) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::AssignmentDueDateLocked,
                    "Due date cannot change once submissions exist",
                )));
            }
            Err(e) => return Ok(internal_error("Failed to count submissions", e)),
        }
    }

    let update = AssignmentUpdate {
        title: data.title.map(|t| t.trim().to_string()),
        description: data.description,
        due_at: data.due_at,
        max_score: data.max_score,
    };

    let updated = match storage.update_assignment(assignment.id, update).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Ok(internal_error("Assignment update failed", e)),
    };
    info!("Assignment {} updated by user {}", updated.id, user.id);

    match assignment_row(&storage, &updated).await {
        Ok(row) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            row,
            "Assignment updated successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to load assignment details", e)),
    }
}
