//! 选课存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::class_students::{ActiveModel, Column, Entity as ClassStudents};
use crate::errors::{PortalError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 学生加入班级，已加入时返回 false
    pub async fn enroll_student_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        if self.is_enrolled(class_id, student_id).await? {
            return Ok(false);
        }

        let model = ActiveModel {
            class_id: Set(class_id),
            student_id: Set(student_id),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("加入班级失败: {e}")))?;

        Ok(true)
    }

    pub async fn remove_student_impl(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let result = ClassStudents::delete_many()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("移出班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn is_enrolled(&self, class_id: i64, student_id: i64) -> Result<bool> {
        let existing = ClassStudents::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(existing.is_some())
    }

    /// 学生已加入的班级 ID
    pub(crate) async fn class_ids_for_student(&self, student_id: i64) -> Result<Vec<i64>> {
        let rows = ClassStudents::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::EnrolledAt)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(rows.into_iter().map(|r| r.class_id).collect())
    }

    /// 批量加载班级的学生 ID，按加入时间排序
    pub(crate) async fn student_ids_by_class(
        &self,
        class_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<i64>>> {
        let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
        if class_ids.is_empty() {
            return Ok(map);
        }

        let rows = ClassStudents::find()
            .filter(Column::ClassId.is_in(class_ids.iter().copied()))
            .order_by_asc(Column::EnrolledAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询选课记录失败: {e}")))?;

        for row in rows {
            map.entry(row.class_id).or_default().push(row.student_id);
        }
        Ok(map)
    }
}
