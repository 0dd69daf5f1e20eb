use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::AnalyticsService;
use crate::domain::aggregate::dashboard_totals;
use crate::errors::PortalError;
use crate::models::{ApiResponse, AppStartTime, analytics::responses::DashboardStatsResponse};
use crate::services::internal_error;

pub async fn get_stats(
    service: &AnalyticsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let snapshot = async {
        let users = storage.list_all_users().await?;
        let classes = storage.list_all_classes().await?;
        let assignments = storage.list_all_assignments().await?;
        let submissions = storage.list_all_submissions().await?;
        Ok::<_, PortalError>(dashboard_totals(&users, &classes, &assignments, &submissions))
    };
    let totals = match snapshot.await {
        Ok(totals) => totals,
        Err(e) => return Ok(internal_error("Failed to compute dashboard stats", e)),
    };

    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or(0);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DashboardStatsResponse {
            totals,
            uptime_seconds,
        },
        "Dashboard stats retrieved successfully",
    )))
}
