use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::analytics::requests::AdminSearchParams;
use crate::models::users::entities::UserRole;
use crate::services::AnalyticsService;

// 懒加载的全局 AnalyticsService 实例
static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);

pub async fn get_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.get_stats(&req).await
}

pub async fn user_analytics(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.user_analytics(&req).await
}

pub async fn class_analytics(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.class_analytics(&req).await
}

pub async fn assignment_analytics(req: HttpRequest) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.assignment_analytics(&req).await
}

pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<AdminSearchParams>,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .list_classes(&req, query.into_inner())
        .await
}

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AdminSearchParams>,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE
        .list_assignments(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/stats", web::get().to(get_stats))
                    .route("/analytics/users", web::get().to(user_analytics))
                    .route("/analytics/classes", web::get().to(class_analytics))
                    .route("/analytics/assignments", web::get().to(assignment_analytics))
                    .route("/classes", web::get().to(list_classes))
                    .route("/assignments", web::get().to(list_assignments)),
            ),
    );
}
