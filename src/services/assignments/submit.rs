use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{AssignmentService, load_assignment};
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{
        SubmissionStatus,
        requests::{SubmissionUpsert, SubmitAssignmentRequest},
    },
};
use crate::services::{current_user, internal_error, rows::submission_row};

pub async fn submit_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    data: SubmitAssignmentRequest,
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

    if !class.has_student(user.id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You are not enrolled in this class",
        )));
    }

    let content = data.content.trim();
    if content.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Submission content must not be empty",
        )));
    }

    let existing = match storage
        .get_submission_by_assignment_and_student(assignment.id, user.id)
        .await
    {
        Ok(existing) => existing,
        Err(e) => return Ok(internal_error("Failed to load previous submission", e)),
    };

    // 已评分的提交不再接受覆盖
    if existing.as_ref().is_some_and(|s| s.is_graded()) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SubmissionAlreadyGraded,
            "This submission has already been graded",
        )));
    }

    let now = Utc::now();
    let upsert = SubmissionUpsert {
        assignment_id: assignment.id,
        student_id: user.id,
        content: content.to_string(),
        status: SubmissionStatus::on_submit(now, assignment.due_at),
        submitted_at: now,
    };

    let submission = match storage.upsert_submission(upsert).await {
        Ok(submission) => submission,
        Err(e) => return Ok(internal_error("Submission failed", e)),
    };
    info!(
        "Student {} submitted assignment {} ({})",
        user.id, assignment.id, submission.status
    );

    let row = match submission_row(&storage, &submission).await {
        Ok(row) => row,
        Err(e) => return Ok(internal_error("Failed to load submission details", e)),
    };

    if existing.is_some() {
        Ok(HttpResponse::Ok().json(ApiResponse::success(row, "Submission updated successfully")))
    } else {
        Ok(HttpResponse::Created().json(ApiResponse::success(row, "Submitted successfully")))
    }
}
