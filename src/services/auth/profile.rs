use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::{requests::UpdateProfileRequest, responses::UserInfoResponse};
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::users::check_account_fields;
use crate::services::{current_user, evict_cached_user};
use crate::utils::password::hash_password;

use super::AuthService;

pub async fn handle_get_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match current_user(request) {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

/// 更新自己的名称或密码，角色与邮箱只能由管理员修改
pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let me = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = check_account_fields(
        update_data.name.as_deref(),
        None,
        update_data.password.as_deref(),
    ) {
        return Ok(resp);
    }

    let password = match update_data.password.as_deref().map(hash_password).transpose() {
        Ok(hash) => hash,
        Err(e) => return Ok(crate::services::internal_error("Password hashing failed", e)),
    };

    let update = UpdateUserRequest {
        name: update_data.name.map(|n| n.trim().to_string()),
        email: None,
        password,
        role: None,
    };

    match storage.update_user(me.id, update).await {
        Ok(Some(user)) => {
            evict_cached_user(request, user.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserInfoResponse { user },
                "Profile updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "User not found"))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            format!("Failed to update profile: {e}"),
        ))),
    }
}
