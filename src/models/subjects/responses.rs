use super::entities::Subject;
use serde::Serialize;
use ts_rs::TS;

// 科目详情（附带教师姓名与班级名称）
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub subject: Subject,
    pub teacher_name: Option<String>,
    pub class_name: Option<String>,
}

// 教师名下科目
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct TeacherSubjectItem {
    pub id: i64,
    pub name: String,
    pub class_id: i64,
    pub class_name: String,
}
