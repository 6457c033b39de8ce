//! 任课分配存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::Subjects;
use crate::entity::subjects;
use crate::entity::teacher_subject_classes::{
    ActiveModel, Column, Entity as TeacherSubjectClasses, Model as AssignmentModel,
};
use crate::errors::{AbsenceTrackerError, Result};
use crate::models::{
    assignments::{entities::Assignment, requests::NewAssignment},
    teachers::responses::{TeacherClassItem, TeacherSubjectClassRef, TeacherSubjectGroup},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建任课分配
    pub async fn create_assignment_impl(&self, req: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            subject_id: Set(req.subject_id),
            class_id: Set(req.class_id),
            academic_period: Set(req.academic_period),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("创建任课分配失败: {e}"))
            })?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取任课分配
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = TeacherSubjectClasses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询任课分配失败: {e}"))
            })?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 查找 (教师, 科目, 班级) 的分配，存在多条时取最早的一条
    pub async fn find_assignment_impl(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Option<Assignment>> {
        let result = TeacherSubjectClasses::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询任课分配失败: {e}"))
            })?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 科目是否归该教师所有且属于该班级
    pub async fn subject_owned_by_impl(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<bool> {
        let count = Subjects::find()
            .filter(subjects::Column::Id.eq(subject_id))
            .filter(subjects::Column::TeacherId.eq(teacher_id))
            .filter(subjects::Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询科目归属失败: {e}"))
            })?;

        Ok(count > 0)
    }

    /// 教师在班级中是否拥有任一科目或任课分配
    pub async fn teacher_has_class_access_impl(
        &self,
        teacher_id: i64,
        class_id: i64,
    ) -> Result<bool> {
        let owned = Subjects::find()
            .filter(subjects::Column::TeacherId.eq(teacher_id))
            .filter(subjects::Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询科目归属失败: {e}"))
            })?;
        if owned > 0 {
            return Ok(true);
        }

        let assigned = TeacherSubjectClasses::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .filter(Column::ClassId.eq(class_id))
            .count(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询任课分配失败: {e}"))
            })?;

        Ok(assigned > 0)
    }

    /// 教师任课班级（扁平列表）
    pub async fn list_teacher_classes_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherClassItem>> {
        let assignments = self.list_assignments_by_teacher(teacher_id).await?;
        let (subject_map, class_map) = self.assignment_name_maps(&assignments).await?;

        Ok(assignments
            .into_iter()
            .map(|a| TeacherClassItem {
                class_id: a.class_id,
                class_name: class_map.get(&a.class_id).cloned().unwrap_or_default(),
                subject_id: a.subject_id,
                subject_name: subject_map.get(&a.subject_id).cloned().unwrap_or_default(),
                academic_period: a.academic_period,
            })
            .collect())
    }

    /// 教师任课科目，按科目分组，组内班级去重
    pub async fn list_teacher_subject_groups_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherSubjectGroup>> {
        let assignments = self.list_assignments_by_teacher(teacher_id).await?;
        let (subject_map, class_map) = self.assignment_name_maps(&assignments).await?;

        let mut groups: Vec<TeacherSubjectGroup> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();

        for a in assignments {
            let class_ref = TeacherSubjectClassRef {
                class_id: a.class_id,
                class_name: class_map.get(&a.class_id).cloned().unwrap_or_default(),
            };

            match index.get(&a.subject_id) {
                Some(&i) => {
                    if !groups[i].classes.contains(&class_ref) {
                        groups[i].classes.push(class_ref);
                    }
                }
                None => {
                    index.insert(a.subject_id, groups.len());
                    groups.push(TeacherSubjectGroup {
                        subject_id: a.subject_id,
                        subject_name: subject_map.get(&a.subject_id).cloned().unwrap_or_default(),
                        classes: vec![class_ref],
                    });
                }
            }
        }

        Ok(groups)
    }

    async fn list_assignments_by_teacher(&self, teacher_id: i64) -> Result<Vec<AssignmentModel>> {
        TeacherSubjectClasses::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询教师任课分配失败: {e}"))
            })
    }

    /// 科目名称与班级名称映射
    async fn assignment_name_maps(
        &self,
        assignments: &[AssignmentModel],
    ) -> Result<(HashMap<i64, String>, HashMap<i64, String>)> {
        let subject_ids: Vec<i64> = assignments.iter().map(|a| a.subject_id).collect();
        let subject_map = self.subject_name_map(subject_ids).await?;
        let class_map = self
            .class_name_map(assignments.iter().map(|a| a.class_id).collect())
            .await?;

        Ok((subject_map, class_map))
    }

    /// 科目 ID 到名称的映射
    pub(super) async fn subject_name_map(
        &self,
        subject_ids: Vec<i64>,
    ) -> Result<HashMap<i64, String>> {
        if subject_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let subjects = Subjects::find()
            .filter(subjects::Column::Id.is_in(subject_ids))
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询科目信息失败: {e}"))
            })?;

        Ok(subjects.into_iter().map(|s| (s.id, s.name)).collect())
    }
}
