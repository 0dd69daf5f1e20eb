use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, load_submission};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{access, current_user, internal_error, rows::submission_row};

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let submission = match load_submission(&storage, submission_id).await {
        Ok(submission) => submission,
        Err(resp) => return Ok(resp),
    };

    let class = match storage.get_assignment_by_id(submission.assignment_id).await {
        Ok(Some(assignment)) => storage.get_class_by_id(assignment.class_id).await,
        Ok(None) => Ok(None),
        Err(e) => Err(e),
    };
    let class = match class {
        Ok(class) => class,
        Err(e) => return Ok(internal_error("Failed to load class", e)),
    };

    if !access::can_view_submission(&user, &submission, class.as_ref()) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to view this submission",
        )));
    }

    match submission_row(&storage, &submission).await {
        Ok(row) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            row,
            "Submission retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to load submission details", e)),
    }
}
