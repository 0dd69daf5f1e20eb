use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::domain::aggregate::submission_tally;
use crate::models::{ApiResponse, submissions::responses::SubmissionListResponse};
use crate::services::{current_user, internal_error, rows::submission_rows};

pub async fn list_my_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let submissions = match storage.list_submissions_by_student(user.id).await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(internal_error("Failed to retrieve submissions", e)),
    };
    let items = match submission_rows(&storage, &submissions).await {
        Ok(rows) => rows,
        Err(e) => return Ok(internal_error("Failed to load submission details", e)),
    };
    let tally = submission_tally(&items);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionListResponse { items, tally },
        "Submission list retrieved successfully",
    )))
}
