use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::domain::filter::search;
use crate::models::{
    ApiResponse,
    assignments::{requests::AssignmentListParams, responses::AssignmentListResponse},
    users::UserRole,
};
use crate::services::{current_user, internal_error, rows::assignment_rows};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 先按角色确定可见班级，再按 class_id 收窄
    let visible = match user.role {
        UserRole::Admin => None,
        UserRole::Teacher => Some(storage.list_classes_by_teacher(user.id).await),
        UserRole::Student => Some(storage.list_classes_by_student(user.id).await),
    };
    let class_ids: Option<Vec<i64>> = match visible {
        None => None,
        Some(Ok(classes)) => Some(classes.iter().map(|c| c.id).collect()),
        Some(Err(e)) => return Ok(internal_error("Failed to load visible classes", e)),
    };
    let class_ids = match (class_ids, query.class_id) {
        (None, None) => None,
        (None, Some(id)) => Some(vec![id]),
        (Some(ids), None) => Some(ids),
        (Some(ids), Some(id)) => Some(ids.into_iter().filter(|c| *c == id).collect()),
    };

    let assignments = match class_ids {
        Some(ids) => storage.list_assignments_by_classes(&ids).await,
        None => storage.list_all_assignments().await,
    };
    let assignments = match assignments {
        Ok(assignments) => assignments,
        Err(e) => return Ok(internal_error("Failed to retrieve assignments", e)),
    };

    let rows = match assignment_rows(&storage, &assignments).await {
        Ok(rows) => rows,
        Err(e) => return Ok(internal_error("Failed to load assignment details", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentListResponse {
            items: search(rows, query.search.as_deref()),
        },
        "Assignment list retrieved successfully",
    )))
}
