use super::entities::Student;
use crate::models::classes::entities::ClassSummary;
use serde::Serialize;
use ts_rs::TS;

// 学生详情（附带班级信息）
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub student: Student,
    pub class: Option<ClassSummary>,
}

// 学生简要信息
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
        }
    }
}

// 批量加入班级的结果
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentCountResponse {
    pub count: u64,
}
