pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod submissions;
pub mod submit;
pub mod update;

#[cfg(test)]
mod handler_tests;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::{
    Assignment,
    requests::{AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest},
};
use crate::models::classes::Class;
use crate::models::submissions::requests::{AssignmentSubmissionParams, SubmitAssignmentRequest};
use crate::models::{ApiResponse, ErrorCode, users::User};
use crate::services::{access, internal_error};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, query).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        data: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, data).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        data: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, data).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }

    // 学生提交或重新提交
    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        data: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, request, assignment_id, data).await
    }

    // 单个作业的提交列表
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        query: AssignmentSubmissionParams,
    ) -> ActixResult<HttpResponse> {
        submissions::list_assignment_submissions(self, request, assignment_id, query).await
    }
}

/// 读取作业及其班级
pub(crate) async fn load_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
) -> Result<(Assignment, Class), HttpResponse> {
    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Err(internal_error("Failed to load assignment", e)),
    };

    match storage.get_class_by_id(assignment.class_id).await {
        Ok(Some(class)) => Ok((assignment, class)),
        Ok(None) => Err(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ClassNotFound, "Class not found"))),
        Err(e) => Err(internal_error("Failed to load class", e)),
    }
}

/// 读取作业并要求当前用户管理其班级
pub(crate) async fn load_managed_assignment(
    storage: &Arc<dyn Storage>,
    user: &User,
    assignment_id: i64,
) -> Result<(Assignment, Class), HttpResponse> {
    let (assignment, class) = load_assignment(storage, assignment_id).await?;
    if !access::can_manage_class(user, &class) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to manage this assignment",
        )));
    }
    Ok((assignment, class))
}

/// 满分必须为正的有限数
pub(crate) fn validate_max_score(max_score: f64) -> Result<(), &'static str> {
    if max_score.is_finite() && max_score > 0.0 {
        Ok(())
    } else {
        Err("max_score must be a positive number")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_max_score() {
        assert!(validate_max_score(100.0).is_ok());
        assert!(validate_max_score(0.5).is_ok());
        assert!(validate_max_score(0.0).is_err());
        assert!(validate_max_score(-5.0).is_err());
        assert!(validate_max_score(f64::NAN).is_err());
        assert!(validate_max_score(f64::INFINITY).is_err());
    }
}
