pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::{validate_email, validate_name, validate_password_simple};

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 最近创建的用户（仪表盘）
    pub async fn list_recent_users(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_recent_users(self, request).await
    }

    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}

/// 校验账号字段，未提供的字段跳过
pub(crate) fn check_account_fields(
    name: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<(), HttpResponse> {
    if let Some(name) = name
        && let Err(msg) = validate_name(name)
    {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    if let Some(email) = email
        && let Err(msg) = validate_email(email.trim())
    {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Some(password) = password
        && let Err(msg) = validate_password_simple(password)
    {
        return Err(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    Ok(())
}

/// 邮箱未被其他用户占用（`owner` 为当前持有者时视为可用）
pub(crate) async fn ensure_email_available(
    storage: &Arc<dyn Storage>,
    email: &str,
    owner: Option<i64>,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(existing)) if Some(existing.id) != owner => Err(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::UserEmailAlreadyExists, "Email already registered"),
        )),
        Ok(_) => Ok(()),
        Err(e) => Err(super::internal_error("Failed to check email", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_account_field_checks() {
        assert!(check_account_fields(Some("Ada"), Some("ada@school.test"), Some("Str0ngPass")).is_ok());
        assert!(check_account_fields(None, None, None).is_ok());

        let resp = check_account_fields(Some("  "), None, None).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(check_account_fields(None, Some("nope"), None).is_err());
        assert!(check_account_fields(None, None, Some("short")).is_err());
    }
}
