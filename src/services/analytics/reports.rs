use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AnalyticsService;
use crate::domain::aggregate::{
    assignments_by_month, class_enrollment, classes_by_month, count_by_role,
    submissions_by_assignment, users_by_month,
};
use crate::models::{
    ApiResponse,
    analytics::responses::{
        AssignmentAnalyticsResponse, ClassAnalyticsResponse, UserAnalyticsResponse,
    },
};
use crate::services::internal_error;

pub async fn user_analytics(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_all_users().await {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserAnalyticsResponse {
                users_by_role: count_by_role(&users),
                users_by_month: users_by_month(&users),
            },
            "User analytics retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to compute user analytics", e)),
    }
}

pub async fn class_analytics(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_all_classes().await {
        Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassAnalyticsResponse {
                classes_by_month: classes_by_month(&classes),
                classes_with_student_count: class_enrollment(&classes),
            },
            "Class analytics retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to compute class analytics", e)),
    }
}

pub async fn assignment_analytics(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let assignments = match storage.list_all_assignments().await {
        Ok(assignments) => assignments,
        Err(e) => return Ok(internal_error("Failed to load assignments", e)),
    };
    let submissions = match storage.list_all_submissions().await {
        Ok(submissions) => submissions,
        Err(e) => return Ok(internal_error("Failed to load submissions", e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentAnalyticsResponse {
            assignments_by_month: assignments_by_month(&assignments),
            submissions_by_assignment: submissions_by_assignment(&assignments, &submissions),
        },
        "Assignment analytics retrieved successfully",
    )))
}
