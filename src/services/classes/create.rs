use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{ClassService, class_row};
use crate::models::classes::requests::{CreateClassRequest, NewClass};
use crate::models::users::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, internal_error};
use crate::storage::Storage;
use crate::utils::random_code::generate_random_code;
use crate::utils::validate::{validate_class_code, validate_title};

/// 自动生成加入码的长度
const CLASS_CODE_LEN: usize = 8;
/// 自动生成加入码的最大尝试次数
const CLASS_CODE_ATTEMPTS: usize = 5;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = validate_title(&class_data.title) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let teacher_id = match resolve_teacher(&user, class_data.teacher_id, &storage).await {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let code = match class_data.code {
        Some(code) => {
            let code = code.trim().to_string();
            if let Err(msg) = validate_class_code(&code) {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::ClassCodeInvalid, msg)));
            }
            match storage.get_class_by_code(&code).await {
                Ok(None) => code,
                Ok(Some(_)) => return Ok(duplicate_code()),
                Err(e) => return Ok(internal_error("Failed to check class code", e)),
            }
        }
        None => match unused_code(&storage).await {
            Ok(Some(code)) => code,
            Ok(None) => {
                return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ClassCreationFailed,
                    "Could not generate a unique class code",
                )));
            }
            Err(e) => return Ok(internal_error("Failed to check class code", e)),
        },
    };

    let new_class = NewClass {
        teacher_id,
        title: class_data.title.trim().to_string(),
        code,
        description: class_data.description,
        subject: class_data.subject,
    };

    match storage.create_class(new_class).await {
        Ok(class) => {
            info!("Class {} ({}) created by user {}", class.id, class.code, user.id);
            let row = class_row(&storage, &class).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(row, "Class created successfully")))
        }
        Err(e) if e.is_unique_violation() => Ok(duplicate_code()),
        Err(e) => {
            error!("Class creation failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ClassCreationFailed,
                format!("Class creation failed: {e}"),
            )))
        }
    }
}

/// 确定班级负责教师：教师只能为自己创建，管理员必须指定一名教师
async fn resolve_teacher(
    user: &User,
    requested: Option<i64>,
    storage: &Arc<dyn Storage>,
) -> Result<i64, HttpResponse> {
    match user.role {
        UserRole::Teacher => match requested {
            Some(id) if id != user.id => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "You do not have permission to create a class for another teacher",
            ))),
            _ => Ok(user.id),
        },
        UserRole::Admin => {
            let Some(teacher_id) = requested else {
                return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "teacher_id is required when an admin creates a class",
                )));
            };
            match storage.get_user_by_id(teacher_id).await {
                Ok(Some(teacher)) if teacher.role == UserRole::Teacher => Ok(teacher.id),
                Ok(Some(_)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "Admin can only create classes for teachers",
                ))),
                Ok(None) => Err(HttpResponse::NotFound()
                    .json(ApiResponse::error_empty(ErrorCode::UserNotFound, "Teacher not found"))),
                Err(e) => Err(internal_error("Failed to load teacher", e)),
            }
        }
        UserRole::Student => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You do not have permission to create a class",
        ))),
    }
}

async fn unused_code(storage: &Arc<dyn Storage>) -> crate::errors::Result<Option<String>> {
    for _ in 0..CLASS_CODE_ATTEMPTS {
        let code = generate_random_code(CLASS_CODE_LEN);
        if storage.get_class_by_code(&code).await?.is_none() {
            return Ok(Some(code));
        }
    }
    Ok(None)
}

pub(super) fn duplicate_code() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::ClassAlreadyExists,
        "Class code already in use",
    ))
}
