use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::Session;
use crate::models::students::responses::StudentSummary;

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/absence.ts")]
pub struct SubjectRef {
    pub id: i64,
    pub name: String,
}

// 缺勤列表条目（附带学生与科目）
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/absence.ts")]
pub struct AbsenceListItem {
    pub id: i64,
    pub date: NaiveDate,
    pub session: Session,
    pub student: Option<StudentSummary>,
    pub subject: Option<SubjectRef>,
    pub is_justified: bool,
    pub justification_note: Option<String>,
}

// 单个学生的缺勤记录
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/absence.ts")]
pub struct StudentAbsenceItem {
    pub id: i64,
    pub date: NaiveDate,
    pub session: Session,
    pub subject: Option<SubjectRef>,
    pub is_justified: bool,
    pub justification_note: Option<String>,
}
