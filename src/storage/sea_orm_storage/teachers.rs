//! 教师存储操作

use super::SeaOrmStorage;
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::errors::{AbsenceTrackerError, Result};
use crate::models::teachers::{
    entities::Teacher,
    requests::{CreateTeacherRequest, UpdateTeacherRequest},
};
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建教师
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<Teacher> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("创建教师失败: {e}")))?;

        Ok(result.into_teacher())
    }

    /// 通过 ID 获取教师
    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 按名和姓查找教师
    ///
    /// SQLite 的 LOWER 只处理 ASCII：ASCII 输入直接在 SQL 中比较，
    /// 其余情况按字符数预筛后在应用层做 Unicode 大小写比较。
    pub async fn find_teacher_by_name_impl(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Teacher>> {
        let first = first_name.trim().to_lowercase();
        let last = last_name.trim().to_lowercase();

        let query = if first.is_ascii() && last.is_ascii() {
            let first_col = Func::lower(Expr::col(Column::FirstName));
            let last_col = Func::lower(Expr::col(Column::LastName));
            Teachers::find()
                .filter(first_col.eq(first.as_str()))
                .filter(last_col.eq(last.as_str()))
        } else {
            let first_len = Func::char_length(Expr::col(Column::FirstName));
            let last_len = Func::char_length(Expr::col(Column::LastName));
            Teachers::find()
                .filter(first_len.eq(first.chars().count() as i64))
                .filter(last_len.eq(last.chars().count() as i64))
        };

        let candidates = query
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(candidates
            .into_iter()
            .find(|t| t.first_name.to_lowercase() == first && t.last_name.to_lowercase() == last)
            .map(|m| m.into_teacher()))
    }

    /// 列出全部教师
    pub async fn list_teachers_impl(&self) -> Result<Vec<Teacher>> {
        let result = Teachers::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询教师列表失败: {e}"))
            })?;

        Ok(result.into_iter().map(|m| m.into_teacher()).collect())
    }

    /// 更新教师（乐观锁）
    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
        expected_version: i32,
    ) -> Result<Option<Teacher>> {
        let now = chrono::Utc::now().timestamp();

        let result = Teachers::update_many()
            .col_expr(Column::FirstName, Expr::value(update.first_name))
            .col_expr(Column::LastName, Expr::value(update.last_name))
            .col_expr(Column::Version, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("更新教师失败: {e}")))?;

        if result.rows_affected == 0 {
            return match self.get_teacher_by_id_impl(id).await? {
                None => Ok(None),
                Some(current) => Err(AbsenceTrackerError::conflict(format!(
                    "Teacher {id} was modified concurrently (expected version {expected_version}, found {})",
                    current.version
                ))),
            };
        }

        self.get_teacher_by_id_impl(id).await
    }

    /// 删除教师
    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let result = Teachers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("删除教师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 教师总数
    pub async fn count_teachers_impl(&self) -> Result<u64> {
        Teachers::find()
            .count(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("统计教师数量失败: {e}")))
    }
}
