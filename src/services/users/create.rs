use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, check_account_fields, ensure_email_available};
use crate::models::{ApiResponse, ErrorCode, users::requests::CreateUserRequest};
use crate::utils::password::hash_password;

/// 管理员创建任意角色的账号
pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = check_account_fields(
        Some(&user_data.name),
        Some(&user_data.email),
        Some(&user_data.password),
    ) {
        return Ok(resp);
    }

    if let Err(resp) = ensure_email_available(&storage, &user_data.email, None).await {
        return Ok(resp);
    }

    user_data.name = user_data.name.trim().to_string();
    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(crate::services::internal_error("Password hashing failed", e)),
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.id, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "User created successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, "Email already registered"),
        )),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::UserCreationFailed,
            format!("User creation failed: {e}"),
        ))),
    }
}
