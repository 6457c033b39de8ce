//! 缺勤存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::absences::{ActiveModel, Column, Entity as Absences, Model as AbsenceModel};
use crate::entity::prelude::{Students, TeacherSubjectClasses};
use crate::entity::{students, teacher_subject_classes};
use crate::errors::{AbsenceTrackerError, Result};
use crate::models::{
    absences::{
        entities::{Absence, Session},
        requests::NewAbsence,
        responses::{AbsenceListItem, StudentAbsenceItem, SubjectRef},
    },
    students::responses::StudentSummary,
    teachers::responses::TeacherAbsenceItem,
};
use crate::utils::date::date_from_timestamp;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

// (学生, 日期, 时段, 分配)
type MarkTuple = (i64, i64, String, i64);

fn new_absence_model(absence: NewAbsence, now: i64) -> ActiveModel {
    ActiveModel {
        date: Set(absence.date),
        session: Set(absence.session.to_string()),
        student_id: Set(absence.student_id),
        teacher_subject_class_id: Set(absence.teacher_subject_class_id),
        is_justified: Set(absence.is_justified),
        justification_note: Set(absence.justification_note),
        version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// 缺勤记录关联的名称信息
struct AbsenceContext {
    students: HashMap<i64, StudentSummary>,
    // 分配 ID -> (科目 ID, 班级 ID)
    assignments: HashMap<i64, (i64, i64)>,
    subjects: HashMap<i64, String>,
    classes: HashMap<i64, String>,
}

impl AbsenceContext {
    fn subject_ref(&self, teacher_subject_class_id: i64) -> Option<SubjectRef> {
        let (subject_id, _) = self.assignments.get(&teacher_subject_class_id)?;
        Some(SubjectRef {
            id: *subject_id,
            name: self.subjects.get(subject_id).cloned().unwrap_or_default(),
        })
    }
}

impl SeaOrmStorage {
    /// 创建单条缺勤
    pub async fn create_absence_impl(&self, absence: NewAbsence) -> Result<Absence> {
        let now = chrono::Utc::now().timestamp();

        let result = new_absence_model(absence, now)
            .insert(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("创建缺勤记录失败: {e}"))
            })?;

        Ok(result.into_absence())
    }

    /// 在单个事务中批量写入缺勤
    pub async fn record_absences_impl(
        &self,
        absences: Vec<NewAbsence>,
        dedupe: bool,
    ) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("开启事务失败: {e}")))?;

        let mut seen: HashSet<MarkTuple> = HashSet::new();
        let mut inserted = 0u64;

        for absence in absences {
            if dedupe {
                let key: MarkTuple = (
                    absence.student_id,
                    absence.date,
                    absence.session.to_string(),
                    absence.teacher_subject_class_id,
                );
                if !seen.insert(key.clone()) || Self::mark_exists(&txn, &key).await? {
                    debug!(
                        "Skipping duplicate absence for student {} on {} {}",
                        key.0, key.1, key.2
                    );
                    continue;
                }
            }

            new_absence_model(absence, now)
                .insert(&txn)
                .await
                .map_err(|e| {
                    AbsenceTrackerError::database_operation(format!("写入缺勤记录失败: {e}"))
                })?;
            inserted += 1;
        }

        txn.commit()
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(inserted)
    }

    async fn mark_exists<C: ConnectionTrait>(conn: &C, key: &MarkTuple) -> Result<bool> {
        let count = Absences::find()
            .filter(Column::StudentId.eq(key.0))
            .filter(Column::Date.eq(key.1))
            .filter(Column::Session.eq(key.2.as_str()))
            .filter(Column::TeacherSubjectClassId.eq(key.3))
            .count(conn)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询缺勤记录失败: {e}"))
            })?;

        Ok(count > 0)
    }

    /// 通过 ID 获取缺勤
    pub async fn get_absence_by_id_impl(&self, id: i64) -> Result<Option<Absence>> {
        let result = Absences::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询缺勤记录失败: {e}"))
            })?;

        Ok(result.map(|m| m.into_absence()))
    }

    /// 列出全部缺勤
    pub async fn list_absences_impl(&self) -> Result<Vec<AbsenceListItem>> {
        let absences = Absences::find()
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询缺勤列表失败: {e}"))
            })?;

        let ctx = self.load_absence_context(&absences).await?;

        Ok(absences
            .into_iter()
            .map(|a| AbsenceListItem {
                id: a.id,
                date: date_from_timestamp(a.date),
                session: parse_stored_session(&a.session),
                student: ctx.students.get(&a.student_id).cloned(),
                subject: ctx.subject_ref(a.teacher_subject_class_id),
                is_justified: a.is_justified,
                justification_note: a.justification_note,
            })
            .collect())
    }

    /// 列出学生的缺勤
    pub async fn list_student_absences_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAbsenceItem>> {
        let absences = Absences::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询学生缺勤失败: {e}"))
            })?;

        let ctx = self.load_absence_context(&absences).await?;

        Ok(absences
            .into_iter()
            .map(|a| StudentAbsenceItem {
                id: a.id,
                date: date_from_timestamp(a.date),
                session: parse_stored_session(&a.session),
                subject: ctx.subject_ref(a.teacher_subject_class_id),
                is_justified: a.is_justified,
                justification_note: a.justification_note,
            })
            .collect())
    }

    /// 列出教师记录的缺勤，按日期倒序、ID 倒序
    pub async fn list_teacher_absences_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherAbsenceItem>> {
        let assignment_ids: Vec<i64> = TeacherSubjectClasses::find()
            .filter(teacher_subject_classes::Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询教师任课分配失败: {e}"))
            })?
            .into_iter()
            .map(|a| a.id)
            .collect();

        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let absences = Absences::find()
            .filter(Column::TeacherSubjectClassId.is_in(assignment_ids))
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询教师缺勤记录失败: {e}"))
            })?;

        let ctx = self.load_absence_context(&absences).await?;

        Ok(absences
            .into_iter()
            .map(|a| {
                let (subject_id, class_id) = ctx
                    .assignments
                    .get(&a.teacher_subject_class_id)
                    .copied()
                    .unwrap_or_default();
                let student_name = ctx
                    .students
                    .get(&a.student_id)
                    .map(|s| format!("{} {}", s.first_name, s.last_name))
                    .unwrap_or_default();

                TeacherAbsenceItem {
                    id: a.id,
                    date: date_from_timestamp(a.date),
                    session: parse_stored_session(&a.session),
                    student_id: a.student_id,
                    student_name,
                    subject_id,
                    subject_name: ctx.subjects.get(&subject_id).cloned().unwrap_or_default(),
                    class_id,
                    class_name: ctx.classes.get(&class_id).cloned().unwrap_or_default(),
                }
            })
            .collect())
    }

    /// 指定日期、时段、科目与班级下缺勤的学生
    pub async fn list_absent_student_ids_impl(
        &self,
        class_id: i64,
        subject_id: i64,
        date: i64,
        session: Session,
    ) -> Result<Vec<i64>> {
        let assignment_ids: Vec<i64> = TeacherSubjectClasses::find()
            .filter(teacher_subject_classes::Column::ClassId.eq(class_id))
            .filter(teacher_subject_classes::Column::SubjectId.eq(subject_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询任课分配失败: {e}"))
            })?
            .into_iter()
            .map(|a| a.id)
            .collect();

        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let absences = Absences::find()
            .filter(Column::TeacherSubjectClassId.is_in(assignment_ids))
            .filter(Column::Date.eq(date))
            .filter(Column::Session.eq(session.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("查询缺勤记录失败: {e}"))
            })?;

        let mut ids: Vec<i64> = absences.into_iter().map(|a| a.student_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// 更新缺勤说明（乐观锁）
    pub async fn update_absence_justification_impl(
        &self,
        id: i64,
        is_justified: bool,
        justification_note: Option<String>,
        expected_version: i32,
    ) -> Result<Option<Absence>> {
        let now = chrono::Utc::now().timestamp();

        let result = Absences::update_many()
            .col_expr(Column::IsJustified, Expr::value(is_justified))
            .col_expr(Column::JustificationNote, Expr::value(justification_note))
            .col_expr(Column::Version, Expr::value(expected_version + 1))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("更新缺勤记录失败: {e}"))
            })?;

        if result.rows_affected == 0 {
            return match self.get_absence_by_id_impl(id).await? {
                None => Ok(None),
                Some(current) => Err(AbsenceTrackerError::conflict(format!(
                    "Absence {id} was modified concurrently (expected version {expected_version}, found {})",
                    current.version
                ))),
            };
        }

        self.get_absence_by_id_impl(id).await
    }

    /// 删除缺勤
    pub async fn delete_absence_impl(&self, id: i64) -> Result<bool> {
        let result = Absences::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_operation(format!("删除缺勤记录失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 缺勤总数
    pub async fn count_absences_impl(&self) -> Result<u64> {
        Absences::find()
            .count(&self.db)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("统计缺勤数量失败: {e}")))
    }

    /// 批量加载缺勤记录关联的学生、分配、科目与班级
    async fn load_absence_context(&self, absences: &[AbsenceModel]) -> Result<AbsenceContext> {
        let student_ids: Vec<i64> = absences.iter().map(|a| a.student_id).collect();
        let assignment_ids: Vec<i64> = absences
            .iter()
            .map(|a| a.teacher_subject_class_id)
            .collect();

        let students: HashMap<i64, StudentSummary> = if student_ids.is_empty() {
            HashMap::new()
        } else {
            Students::find()
                .filter(students::Column::Id.is_in(student_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    AbsenceTrackerError::database_operation(format!("查询学生信息失败: {e}"))
                })?
                .into_iter()
                .map(|s| {
                    (
                        s.id,
                        StudentSummary {
                            id: s.id,
                            first_name: s.first_name,
                            last_name: s.last_name,
                        },
                    )
                })
                .collect()
        };

        let assignments: HashMap<i64, (i64, i64)> = if assignment_ids.is_empty() {
            HashMap::new()
        } else {
            TeacherSubjectClasses::find()
                .filter(teacher_subject_classes::Column::Id.is_in(assignment_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    AbsenceTrackerError::database_operation(format!("查询任课分配失败: {e}"))
                })?
                .into_iter()
                .map(|a| (a.id, (a.subject_id, a.class_id)))
                .collect()
        };

        let subjects = self
            .subject_name_map(assignments.values().map(|(s, _)| *s).collect())
            .await?;
        let classes = self
            .class_name_map(assignments.values().map(|(_, c)| *c).collect())
            .await?;

        Ok(AbsenceContext {
            students,
            assignments,
            subjects,
            classes,
        })
    }
}

fn parse_stored_session(raw: &str) -> Session {
    raw.parse::<Session>().unwrap_or(Session::Morning)
}
