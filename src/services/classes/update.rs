use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{ClassService, class_row, create::duplicate_code, load_managed_class};
use crate::models::{ApiResponse, ErrorCode, classes::requests::UpdateClassRequest};
use crate::services::{current_user, internal_error};
use crate::utils::validate::{validate_class_code, validate_title};

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    mut update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let class = match load_managed_class(&storage, &user, class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    if let Some(title) = update_data.title.as_deref() {
        if let Err(msg) = validate_title(title) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        update_data.title = Some(title.trim().to_string());
    }

    if let Some(code) = update_data.code.as_deref() {
        let code = code.trim().to_string();
        if let Err(msg) = validate_class_code(&code) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ClassCodeInvalid, msg)));
        }
        match storage.get_class_by_code(&code).await {
            Ok(Some(other)) if other.id != class.id => return Ok(duplicate_code()),
            Ok(_) => {}
            Err(e) => return Ok(internal_error("Failed to check class code", e)),
        }
        update_data.code = Some(code);
    }

    match storage.update_class(class.id, update_data).await {
        Ok(Some(updated)) => {
            info!("Class {} updated by user {}", updated.id, user.id);
            let row = class_row(&storage, &updated).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                row,
                "Class information updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ClassNotFound, "Class not found"))),
        Err(e) if e.is_unique_violation() => Ok(duplicate_code()),
        Err(e) => {
            error!("Class update failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Class update failed: {e}"),
            )))
        }
    }
}
