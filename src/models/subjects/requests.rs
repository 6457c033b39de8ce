use serde::Deserialize;
use ts_rs::TS;

// 创建科目请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub teacher_id: i64,
    pub class_id: i64,
}

// 更新科目请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct UpdateSubjectRequest {
    pub id: Option<i64>,
    pub name: String,
    pub teacher_id: i64,
    pub class_id: i64,
    pub version: Option<i32>,
}
