use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::RegisterRequest,
    users::{UserRole, requests::CreateUserRequest},
};
use crate::services::users::{check_account_fields, ensure_email_available};
use crate::utils::password::hash_password;

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) = check_account_fields(
        Some(&register_request.name),
        Some(&register_request.email),
        Some(&register_request.password),
    ) {
        return Ok(resp);
    }

    if let Err(resp) = ensure_email_available(&storage, &register_request.email, None).await {
        return Ok(resp);
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(crate::services::internal_error("Password hashing failed", e)),
    };

    let create_request = CreateUserRequest {
        name: register_request.name.trim().to_string(),
        email: register_request.email,
        password: password_hash,
        role: UserRole::Student,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            info!("Student {} registered", user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "Registration successful")))
        }
        Err(e) if e.is_unique_violation() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, "Email already registered"),
        )),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::RegisterFailed,
            format!("Registration failed: {e}"),
        ))),
    }
}
