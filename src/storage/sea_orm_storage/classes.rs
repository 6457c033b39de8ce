//! 班级存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::entity::prelude::{Subjects, TeacherSubjectClasses, Teachers};
use crate::entity::{subjects, teacher_subject_classes, teachers};
use crate::errors::{AbsenceTrackerError, Result};
use crate::models::{
    assignments::responses::AssignmentView,
    classes::{
        entities::Class,
        requests::{CreateClassRequest, UpdateClassRequest},
        responses::ClassDetailResponse,
    },
    students::responses::StudentSummary,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 获取班级详情
    pub async fn get_class_detail_impl(
        &self,
        class_id: i64,
    ) -> Result<Option<ClassDetailResponse>> {
        let Some(class) = self.get_class_by_id_impl(class_id).await? else {
            return Ok(None);
        };

        let students = self
            .list_students_by_class_impl(class_id)
            .await?
            .iter()
            .map(StudentSummary::from)
            .collect();

        let assignments = TeacherSubjectClasses::find()
            .filter(teacher_subject_classes::Column::ClassId.eq(class_id))
            .order_by_asc(teacher_subject_classes::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询班级任课分配失败: {e}"))
            })?;

        // 批量查询教师与科目名称
        let teacher_ids: Vec<i64> = assignments.iter().map(|a| a.teacher_id).collect();
        let subject_ids: Vec<i64> = assignments.iter().map(|a| a.subject_id).collect();

        let teacher_map: HashMap<i64, String> = if teacher_ids.is_empty() {
            HashMap::new()
        } else {
            Teachers::find()
                .filter(teachers::Column::Id.is_in(teacher_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    AbsenceTrackerError::database_operation(format!("查询教师信息失败: {e}"))
                })?
                .into_iter()
                .map(|t| (t.id, format!("{} {}", t.first_name, t.last_name)))
                .collect()
        };

        let subject_map: HashMap<i64, String> = if subject_ids.is_empty() {
            HashMap::new()
        } else {
            Subjects::find()
                .filter(subjects::Column::Id.is_in(subject_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    AbsenceTrackerError::database_operation(format!("查询科目信息失败: {e}"))
                })?
                .into_iter()
                .map(|s| (s.id, s.name))
                .collect()
        };

        let assignments = assignments
            .into_iter()
            .map(|a| AssignmentView {
                id: a.id,
                teacher_id: a.teacher_id,
                teacher_name: teacher_map.get(&a.teacher_id).cloned().unwrap_or_default(),
                subject_id: a.subject_id,
                subject_name: subject_map.get(&a.subject_id).cloned().unwrap_or_default(),
                academic_period: a.academic_period,
            })
            .collect();

        Ok(Some(ClassDetailResponse {
            class,
            students,
            assignments,
        }))
    }

    /// 列出全部班级
    pub async fn list_classes_impl(&self) -> Result<Vec<Class>> {
        let result = Classes::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询班级列表失败: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_class()).collect())
    }

    /// 更新班级信息（乐观锁）
    pub async fn update_class_impl(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
        expected_version: i32,
    ) -> Result<Option<Class>> {
        let now = chrono::Utc::now().timestamp();

        let result = Classes::update_many()
            .col_expr(Column::Name, Expr::value(update.name))
            .col_expr(Column::Description, Expr::value(update.description))
            .col_expr(Column::Version, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(class_id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("更新班级失败: {e}")))?;

        if result.rows_affected == 0 {
            return match self.get_class_by_id_impl(class_id).await? {
                None => Ok(None),
                Some(current) => Err(AbsenceTrackerError::conflict(format!(
                    "Class {class_id} was modified concurrently (expected version {expected_version}, found {})",
                    current.version
                ))),
            };
        }

        self.get_class_by_id_impl(class_id).await
    }

    /// 删除班级
    pub async fn delete_class_impl(&self, class_id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(class_id)
            .exec(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级总数
    pub async fn count_classes_impl(&self) -> Result<u64> {
        Classes::find()
            .count(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("统计班级数量失败: {e}")))
    }
}
