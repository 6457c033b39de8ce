use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use crate::models::absences::entities::Session;

// 教师任课班级（扁平列表）
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherClassItem {
    pub class_id: i64,
    pub class_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub academic_period: String,
}

// 按科目分组的任课班级
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherSubjectGroup {
    pub subject_id: i64,
    pub subject_name: String,
    pub classes: Vec<TeacherSubjectClassRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherSubjectClassRef {
    pub class_id: i64,
    pub class_name: String,
}

// 花名册条目
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct RosterEntry {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub is_absent: bool,
}

// 教师缺勤历史条目
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherAbsenceItem {
    pub id: i64,
    pub date: NaiveDate,
    pub session: Session,
    pub student_id: i64,
    pub student_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub class_id: i64,
    pub class_name: String,
}

// 批量标记缺勤结果
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct MarkAbsencesResponse {
    pub count: u64,
    pub teacher_subject_class_id: i64,
    pub date: NaiveDate,
    pub session: Session,
}
