use super::entities::Class;
use crate::models::assignments::responses::AssignmentView;
use crate::models::students::responses::StudentSummary;
use serde::Serialize;
use ts_rs::TS;

// 班级详情（附带学生与任课分配）
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub students: Vec<StudentSummary>,
    pub assignments: Vec<AssignmentView>,
}
