use serde::Deserialize;
use ts_rs::TS;

// 创建学生请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<i64>,
}

// 更新学生请求
//
// id 可选，填写时必须与路径中的 ID 一致；
// version 可选，填写时按该版本做乐观锁校验。
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<i64>,
    pub version: Option<i32>,
}
