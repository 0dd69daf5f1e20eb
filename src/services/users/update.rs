use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, check_account_fields, ensure_email_available};
use crate::models::{ApiResponse, ErrorCode, users::requests::UpdateUserRequest};
use crate::services::{evict_cached_user, internal_error};
use crate::utils::password::hash_password;

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = check_account_fields(
        update_data.name.as_deref(),
        update_data.email.as_deref(),
        update_data.password.as_deref(),
    ) {
        return Ok(resp);
    }

    if let Some(email) = update_data.email.as_deref()
        && let Err(resp) = ensure_email_available(&storage, email, Some(user_id)).await
    {
        return Ok(resp);
    }

    update_data.name = update_data.name.map(|n| n.trim().to_string());
    update_data.password = match update_data.password.as_deref().map(hash_password).transpose() {
        Ok(hash) => hash,
        Err(e) => return Ok(internal_error("Password hashing failed", e)),
    };

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            evict_cached_user(request, user.id).await;
            info!("User {} updated", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"))),
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, "Email already registered"),
        )),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            format!("User update failed: {e}"),
        ))),
    }
}
