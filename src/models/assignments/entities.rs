use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师-科目-班级分配，授权的基本单位
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    // 学期标识
    pub academic_period: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
