use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalyticsService;
use crate::domain::filter::search;
use crate::domain::projection::Lookup;
use crate::models::{
    ApiResponse,
    analytics::requests::AdminSearchParams,
    assignments::responses::AssignmentListResponse,
    classes::responses::ClassRowsResponse,
};
use crate::services::{internal_error, rows::assignment_rows};

pub async fn list_classes(
    service: &AnalyticsService,
    request: &HttpRequest,
    query: AdminSearchParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let classes = match storage.list_all_classes().await {
        Ok(classes) => classes,
        Err(e) => return Ok(internal_error("Failed to load classes", e)),
    };
    let users = match storage.list_all_users().await {
        Ok(users) => users,
        Err(e) => return Ok(internal_error("Failed to load users", e)),
    };

    let rows = Lookup::new(&[], &[], &users).classes(&classes);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassRowsResponse {
            items: search(rows, query.search.as_deref()),
        },
        "Class list retrieved successfully",
    )))
}

pub async fn list_assignments(
    service: &AnalyticsService,
    request: &HttpRequest,
    query: AdminSearchParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let assignments = match storage.list_all_assignments().await {
        Ok(assignments) => assignments,
        Err(e) => return Ok(internal_error("Failed to load assignments", e)),
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
