//! 缺勤记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "absences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    // 当天 UTC 零点的时间戳
    pub date: i64,
    pub session: String,
    pub student_id: i64,
    pub teacher_subject_class_id: i64,
    pub is_justified: bool,
    pub justification_note: Option<String>,
    pub version: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::teacher_subject_classes::Entity",
        from = "Column::TeacherSubjectClassId",
        to = "super::teacher_subject_classes::Column::Id"
    )]
    TeacherSubjectClass,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::teacher_subject_classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherSubjectClass.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_absence(self) -> crate::models::absences::entities::Absence {
        use crate::models::absences::entities::{Absence, Session};
        use crate::utils::date::date_from_timestamp;
        use chrono::{DateTime, Utc};

        Absence {
            id: self.id,
            date: date_from_timestamp(self.date),
            session: self.session.parse::<Session>().unwrap_or(Session::Morning),
            student_id: self.student_id,
            teacher_subject_class_id: self.teacher_subject_class_id,
            is_justified: self.is_justified,
            justification_note: self.justification_note,
            version: self.version,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
