use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, load_managed_class};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = load_managed_class(&storage, &user, class_id).await {
        return Ok(resp);
    }

    // 作业与提交由外键级联删除
    match storage.delete_class(class_id).await {
        Ok(true) => {
            info!("Class {} deleted by user {}", class_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ClassNotFound, "Class not found"))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ClassDeleteFailed,
            format!("Class deletion failed: {e}"),
        ))),
    }
}
