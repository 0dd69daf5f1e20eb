use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_managed_assignment};
use crate::domain::aggregate::submission_tally;
use crate::domain::filter::{ClassFilter, SubmissionFilter};
use crate::models::{
    ApiResponse,
    submissions::{requests::AssignmentSubmissionParams, responses::SubmissionListResponse},
};
use crate::services::{current_user, internal_error, rows::submission_rows};

pub async fn list_assignment_submissions(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    query: AssignmentSubmissionParams,
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

    let submissions = match storage.list_submissions_by_assignments(&[assignment.id]).await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(internal_error("Failed to retrieve submissions", e)),
    };
    let rows = match submission_rows(&storage, &submissions).await {
        Ok(rows) => rows,
        Err(e) => return Ok(internal_error("Failed to load submission details", e)),
    };

    // 统计基于过滤前的全部提交
    let tally = submission_tally(&rows);
    let filter = SubmissionFilter::new(query.status, ClassFilter::All, query.search);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionListResponse {
            items: filter.apply(rows),
            tally,
        },
        "Submission list retrieved successfully",
    )))
}
