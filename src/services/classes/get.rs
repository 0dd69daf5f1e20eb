use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ClassService, class_row, load_class};
use crate::models::{ApiResponse, ErrorCode, classes::responses::ClassDetailResponse};
use crate::services::{access, current_user, internal_error};

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let class = match load_class(&storage, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    if !access::can_view_class(&user, &class) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You do not have permission to view this class",
        )));
    }

    // 只有管理者能看到学生名单
    let students = if access::can_manage_class(&user, &class) {
        match storage.list_users_by_ids(&class.student_ids).await {
            Ok(students) => Some(students),
            Err(e) => return Ok(internal_error("Failed to load class students", e)),
        }
    } else {
        None
    };

    let detail = ClassDetailResponse {
        class: class_row(&storage, &class).await,
        students,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Class information retrieved successfully",
    )))
}
