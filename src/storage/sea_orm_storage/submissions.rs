//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{PortalError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{GradeInput, SubmissionUpsert},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 写入提交：不存在则插入，存在则覆盖内容、状态与提交时间
    pub async fn upsert_submission_impl(&self, req: SubmissionUpsert) -> Result<Submission> {
        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(req.assignment_id))
            .filter(Column::StudentId.eq(req.student_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        let model = match existing {
            Some(existing) => {
                let mut model: ActiveModel = existing.into();
                model.content = Set(req.content);
                model.status = Set(req.status.to_string());
                model.submitted_at = Set(req.submitted_at.timestamp());
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| PortalError::database_operation(format!("更新提交失败: {e}")))?
            }
            None => {
                let model = ActiveModel {
                    assignment_id: Set(req.assignment_id),
                    student_id: Set(req.student_id),
                    content: Set(req.content),
                    status: Set(req.status.to_string()),
                    submitted_at: Set(req.submitted_at.timestamp()),
                    ..Default::default()
                };
                model
                    .insert(&self.db)
                    .await
                    .map_err(|e| PortalError::database_operation(format!("创建提交失败: {e}")))?
            }
        };

        Ok(model.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_by_assignment_and_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn count_submissions_by_assignment_impl(&self, assignment_id: i64) -> Result<u64> {
        Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计提交数量失败: {e}")))
    }

    /// 指定作业下的提交，最新提交在前
    pub async fn list_submissions_by_assignments_impl(
        &self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let submissions = Submissions::find()
            .filter(Column::AssignmentId.is_in(assignment_ids.iter().copied()))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(submissions.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<Submission>> {
        let submissions = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(submissions.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn list_all_submissions_impl(&self) -> Result<Vec<Submission>> {
        let submissions = Submissions::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(submissions.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 评分（重复评分覆盖旧值，不做并发协调）
    pub async fn grade_submission_impl(
        &self,
        id: i64,
        grade: GradeInput,
    ) -> Result<Option<Submission>> {
        let existing = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(SubmissionStatus::Graded.to_string());
        model.grade_score = Set(Some(grade.score));
        model.grade_feedback = Set(grade.feedback);
        model.graded_by = Set(Some(grade.graded_by));
        model.graded_at = Set(Some(chrono::Utc::now().timestamp()));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("评分失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }
}
