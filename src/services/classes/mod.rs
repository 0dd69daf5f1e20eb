pub mod create;
pub mod delete;
pub mod enrollment;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::domain::projection::{ClassRow, project_class};
use crate::models::classes::{
    Class,
    requests::{AddStudentRequest, ClassQueryParams, CreateClassRequest, JoinClassRequest, UpdateClassRequest},
};
use crate::models::{ApiResponse, ErrorCode, users::User};
use crate::services::{access, internal_error};
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    // 获取班级列表（按角色限定范围）
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    pub async fn create_class(
        &self,
        req: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, req, class_data).await
    }

    pub async fn get_class(&self, req: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        get::get_class(self, req, class_id).await
    }

    pub async fn update_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
        update_data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_class(self, req, class_id, update_data).await
    }

    pub async fn delete_class(
        &self,
        req: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_class(self, req, class_id).await
    }

    // 学生通过加入码加入班级
    pub async fn join_class(
        &self,
        req: &HttpRequest,
        join_data: JoinClassRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::join_class(self, req, join_data).await
    }

    pub async fn add_student(
        &self,
        req: &HttpRequest,
        class_id: i64,
        data: AddStudentRequest,
    ) -> ActixResult<HttpResponse> {
        enrollment::add_student(self, req, class_id, data).await
    }

    pub async fn remove_student(
        &self,
        req: &HttpRequest,
        class_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        enrollment::remove_student(self, req, class_id, student_id).await
    }
}

/// 读取班级，不存在时返回 404
pub(crate) async fn load_class(
    storage: &Arc<dyn Storage>,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(class),
        Ok(None) => Err(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ClassNotFound, "Class not found"))),
        Err(e) => Err(internal_error("Failed to load class", e)),
    }
}

/// 读取班级并要求当前用户可管理
pub(crate) async fn load_managed_class(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<Class, HttpResponse> {
    let class = load_class(storage, class_id).await?;
    if !access::can_manage_class(user, &class) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You do not have permission to manage this class",
        )));
    }
    Ok(class)
}

/// 附带教师姓名投影单个班级
pub(crate) async fn class_row(storage: &Arc<dyn Storage>, class: &Class) -> ClassRow {
    let teacher = storage.get_user_by_id(class.teacher_id).await.ok().flatten();
    project_class(class, teacher.as_ref())
}
