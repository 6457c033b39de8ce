//! 科目存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{Classes, Teachers};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects, Model as SubjectModel};
use crate::entity::{classes, teachers};
use crate::errors::{AbsenceTrackerError, Result};
use crate::models::subjects::{
    entities::Subject,
    requests::{CreateSubjectRequest, UpdateSubjectRequest},
    responses::{SubjectDetailResponse, TeacherSubjectItem},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建科目
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            teacher_id: Set(req.teacher_id),
            class_id: Set(req.class_id),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("创建科目失败: {e}")))?;

        Ok(result.into_subject())
    }

    /// 通过 ID 获取科目
    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 获取科目详情
    pub async fn get_subject_detail_impl(&self, id: i64) -> Result<Option<SubjectDetailResponse>> {
        let subject = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("查询科目失败: {e}")))?;

        match subject {
            Some(subject) => Ok(self.attach_subject_names(vec![subject]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 列出全部科目
    pub async fn list_subjects_impl(&self) -> Result<Vec<SubjectDetailResponse>> {
        let subjects = Subjects::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询科目列表失败: {e}"))
            })?;

        self.attach_subject_names(subjects).await
    }

    /// 列出教师名下的科目
    pub async fn list_subjects_by_teacher_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherSubjectItem>> {
        let subjects = Subjects::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询教师科目失败: {e}"))
            })?;

        let class_map = self
            .class_name_map(subjects.iter().map(|s| s.class_id).collect())
            .await?;

        Ok(subjects
            .into_iter()
            .map(|s| TeacherSubjectItem {
                id: s.id,
                class_name: class_map.get(&s.class_id).cloned().unwrap_or_default(),
                name: s.name,
                class_id: s.class_id,
            })
            .collect())
    }

    /// 更新科目（乐观锁）
    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
        expected_version: i32,
    ) -> Result<Option<Subject>> {
        let now = chrono::Utc::now().timestamp();

        let result = Subjects::update_many()
            .col_expr(Column::Name, Expr::value(update.name))
            .col_expr(Column::TeacherId, Expr::value(update.teacher_id))
            .col_expr(Column::ClassId, Expr::value(update.class_id))
            .col_expr(Column::Version, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("更新科目失败: {e}")))?;

        if result.rows_affected == 0 {
            return match self.get_subject_by_id_impl(id).await? {
                None => Ok(None),
                Some(current) => Err(AbsenceTrackerError::conflict(format!(
                    "Subject {id} was modified concurrently (expected version {expected_version}, found {})",
                    current.version
                ))),
            };
        }

        self.get_subject_by_id_impl(id).await
    }

    /// 删除科目
    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("删除科目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 科目总数
    pub async fn count_subjects_impl(&self) -> Result<u64> {
        Subjects::find()
            .count(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("统计科目数量失败: {e}")))
    }

    /// 为科目附加教师姓名与班级名称
    async fn attach_subject_names(
        &self,
        subjects: Vec<SubjectModel>,
    ) -> Result<Vec<SubjectDetailResponse>> {
        let teacher_ids: Vec<i64> = subjects.iter().map(|s| s.teacher_id).collect();
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

        let class_map = self
            .class_name_map(subjects.iter().map(|s| s.class_id).collect())
            .await?;

        Ok(subjects
            .into_iter()
            .map(|s| SubjectDetailResponse {
                teacher_name: teacher_map.get(&s.teacher_id).cloned(),
                class_name: class_map.get(&s.class_id).cloned(),
                subject: s.into_subject(),
            })
            .collect())
    }

    /// 班级 ID 到名称的映射
    pub(super) async fn class_name_map(&self, class_ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        if class_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let classes = Classes::find()
            .filter(classes::Column::Id.is_in(class_ids))
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询班级信息失败: {e}"))
            })?;

        Ok(classes.into_iter().map(|c| (c.id, c.name)).collect())
    }
}
