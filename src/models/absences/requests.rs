use serde::Deserialize;
use ts_rs::TS;

use super::entities::Session;

// 直接创建单条缺勤记录
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/absence.ts")]
pub struct CreateAbsenceRequest {
    pub date: String,
    pub session: String,
    pub student_id: i64,
    pub teacher_subject_class_id: i64,
    #[serde(default)]
    pub is_justified: bool,
    pub justification_note: Option<String>,
}

// 更新缺勤说明
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/absence.ts")]
pub struct JustifyAbsenceRequest {
    pub is_justified: bool,
    pub justification_note: Option<String>,
    pub version: Option<i32>,
}

// 存储层使用的缺勤写入参数（日期已规范化为 UTC 零点时间戳）
#[derive(Debug, Clone)]
pub struct NewAbsence {
    pub date: i64,
    pub session: Session,
    pub student_id: i64,
    pub teacher_subject_class_id: i64,
    pub is_justified: bool,
    pub justification_note: Option<String>,
}
