//! 学生存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::classes::Entity as Classes;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{AbsenceTrackerError, Result};
use crate::models::{
    classes::entities::ClassSummary,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, UpdateStudentRequest},
        responses::StudentResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            class_id: Set(req.class_id),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 获取学生及其所在班级
    pub async fn get_student_detail_impl(&self, id: i64) -> Result<Option<StudentResponse>> {
        let Some(student) = self.get_student_by_id_impl(id).await? else {
            return Ok(None);
        };

        let class = match student.class_id {
            Some(class_id) => self
                .get_class_by_id_impl(class_id)
                .await?
                .map(|c| ClassSummary::from(&c)),
            None => None,
        };

        Ok(Some(StudentResponse { student, class }))
    }

    /// 列出全部学生（附带班级）
    pub async fn list_students_impl(&self) -> Result<Vec<StudentResponse>> {
        let students = Students::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询学生列表失败: {e}"))
            })?;

        // 批量查询班级信息
        let class_ids: Vec<i64> = students.iter().filter_map(|s| s.class_id).collect();
        let mut class_map: HashMap<i64, ClassSummary> = HashMap::new();
        if !class_ids.is_empty() {
            let classes = Classes::find()
                .filter(crate::entity::classes::Column::Id.is_in(class_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    AbsenceTrackerError::database_operation(format!("查询班级信息失败: {e}"))
                })?;
            for class in classes {
                class_map.insert(
                    class.id,
                    ClassSummary {
                        id: class.id,
                        name: class.name,
                    },
                );
            }
        }

        Ok(students
            .into_iter()
            .map(|m| {
                let class = m.class_id.and_then(|id| class_map.get(&id).cloned());
                StudentResponse {
                    student: m.into_student(),
                    class,
                }
            })
            .collect())
    }

    /// 按 ID 批量获取学生
    pub async fn list_students_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Student>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Students::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_student()).collect())
    }

    /// 列出班级内的学生
    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let result = Students::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询班级学生失败: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_student()).collect())
    }

    /// 更新学生（乐观锁）
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        expected_version: i32,
    ) -> Result<Option<Student>> {
        let now = chrono::Utc::now().timestamp();

        let result = Students::update_many()
            .col_expr(Column::FirstName, Expr::value(update.first_name))
            .col_expr(Column::LastName, Expr::value(update.last_name))
            .col_expr(Column::ClassId, Expr::value(update.class_id))
            .col_expr(Column::Version, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("更新学生失败: {e}")))?;

        if result.rows_affected == 0 {
            return match self.get_student_by_id_impl(id).await? {
                None => Ok(None),
                Some(current) => Err(AbsenceTrackerError::conflict(format!(
                    "Student {id} was modified concurrently (expected version {expected_version}, found {})",
                    current.version
                ))),
            };
        }

        self.get_student_by_id_impl(id).await
    }

    /// 删除学生
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量移入班级，不存在的学生 ID 被忽略
    pub async fn move_students_to_class_impl(
        &self,
        class_id: i64,
        student_ids: &[i64],
    ) -> Result<u64> {
        if student_ids.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let result = Students::update_many()
            .col_expr(Column::ClassId, Expr::value(Some(class_id)))
            .col_expr(Column::Version, Expr::cust("version + 1"))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.is_in(student_ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("批量移入班级失败: {e}"))
            })?;

        Ok(result.rows_affected)
    }

    /// 学生总数
    pub async fn count_students_impl(&self) -> Result<u64> {
        Students::find()
            .count(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("统计学生数量失败: {e}")))
    }
}
