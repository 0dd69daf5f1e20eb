use std::sync::Arc;

use crate::models::{
    PaginatedResponse,
    assignments::{
        entities::Assignment,
        requests::{AssignmentUpdate, NewAssignment},
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, NewClass, UpdateClassRequest},
    },
    submissions::{
        entities::Submission,
        requests::{GradeInput, SubmissionUpsert},
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 按 ID 批量获取用户
    async fn list_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 全部用户（统计用）
    async fn list_all_users(&self) -> Result<Vec<User>>;
    // 最近创建的用户
    async fn list_recent_users(&self, limit: u64) -> Result<Vec<User>>;
    async fn count_users_by_role(&self, role: UserRole) -> Result<u64>;
    // 更新用户信息（password 字段为已哈希的密码）
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 班级管理方法
    async fn create_class(&self, class: NewClass) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_by_code(&self, code: &str) -> Result<Option<Class>>;
    // 分页列出班级（可按教师或学生限定范围）
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<PaginatedResponse<Class>>;
    async fn list_all_classes(&self) -> Result<Vec<Class>>;
    async fn list_classes_by_teacher(&self, teacher_id: i64) -> Result<Vec<Class>>;
    async fn list_classes_by_student(&self, student_id: i64) -> Result<Vec<Class>>;
    async fn list_classes_by_ids(&self, ids: &[i64]) -> Result<Vec<Class>>;
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    // 删除班级，作业与提交随外键级联删除
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 选课管理方法
    // 加入班级，已在班级中时返回 false
    async fn enroll_student(&self, class_id: i64, student_id: i64) -> Result<bool>;
    async fn remove_student(&self, class_id: i64, student_id: i64) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_by_classes(&self, class_ids: &[i64]) -> Result<Vec<Assignment>>;
    async fn list_assignments_by_ids(&self, ids: &[i64]) -> Result<Vec<Assignment>>;
    async fn list_all_assignments(&self) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 提交管理方法
    // 首次提交插入，重复提交覆盖内容与状态
    async fn upsert_submission(&self, submission: SubmissionUpsert) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_submission_by_assignment_and_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn count_submissions_by_assignment(&self, assignment_id: i64) -> Result<u64>;
    async fn list_submissions_by_assignments(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>>;
    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<Submission>>;
    async fn list_all_submissions(&self) -> Result<Vec<Submission>>;
    async fn grade_submission(&self, id: i64, grade: GradeInput) -> Result<Option<Submission>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
