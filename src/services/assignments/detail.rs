use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{access, current_user, internal_error, rows::assignment_row};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let (assignment, class) = match load_assignment(&storage, assignment_id).await {
        Ok(found) => found,
        Err(resp) => return Ok(resp),
    };

    if !access::can_view_class(&user, &class) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this assignment",
        )));
    }

    match assignment_row(&storage, &assignment).await {
        Ok(row) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            row,
            "Assignment retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to load assignment details", e)),
    }
}
