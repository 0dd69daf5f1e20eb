use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::config::AppConfig;
use crate::domain::aggregate::submission_tally;
use crate::domain::filter::SubmissionFilter;
use crate::models::{
    ApiResponse,
    submissions::{requests::TeacherSubmissionParams, responses::SubmissionListResponse},
    users::UserRole,
};
use crate::services::{current_user, internal_error, rows::submission_rows};

pub async fn list_teacher_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    query: TeacherSubmissionParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let classes = match user.role {
        UserRole::Admin => storage.list_all_classes().await,
        _ => storage.list_classes_by_teacher(user.id).await,
    };
    let class_ids: Vec<i64> = match classes {
        Ok(classes) => classes.iter().map(|c| c.id).collect(),
        Err(e) => return Ok(internal_error("Failed to load classes", e)),
    };

    let assignments = match storage.list_assignments_by_classes(&class_ids).await {
        Ok(assignments) => assignments,
        Err(e) => return Ok(internal_error("Failed to load assignments", e)),
    };
    let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();

    let submissions = match storage.list_submissions_by_assignments(&assignment_ids).await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(internal_error("Failed to retrieve submissions", e)),
    };
    let rows = match submission_rows(&storage, &submissions).await {
        Ok(rows) => rows,
        Err(e) => return Ok(internal_error("Failed to load submission details", e)),
    };

    let tally = submission_tally(&rows);
    let filter = SubmissionFilter::new(query.status, query.class_id, query.search);
    let limit = effective_limit(query.limit, AppConfig::get().dashboard.submissions_limit);

    let mut items = filter.apply(rows);
    items.truncate(limit);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionListResponse { items, tally },
        "Submission list retrieved successfully",
    )))
}

/// 请求的条数不能超过配置上限
fn effective_limit(requested: Option<usize>, cap: usize) -> usize {
    requested.map_or(cap, |n| n.min(cap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_limit() {
        assert_eq!(effective_limit(None, 50), 50);
        assert_eq!(effective_limit(Some(10), 50), 10);
        assert_eq!(effective_limit(Some(500), 50), 50);
        assert_eq!(effective_limit(Some(0), 50), 0);
    }
}
