use crate::models::teachers::responses::TeacherSubjectGroup;
use serde::Serialize;
use ts_rs::TS;

// 登录后的教师身份
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginIdentity {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

// 登录响应
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub teacher: LoginIdentity,
    pub subjects: Vec<TeacherSubjectGroup>,
    pub access_token: String,
    pub expires_in: i64,
}
