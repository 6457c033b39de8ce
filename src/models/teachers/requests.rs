use serde::Deserialize;
use ts_rs::TS;

use crate::utils::serde_helpers::deserialize_string_or_i64;

// 创建教师请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
}

// 更新教师请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub version: Option<i32>,
}

// 批量标记缺勤请求
//
// classId / subjectId 兼容数字和数字字符串两种写法。
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct MarkAbsencesRequest {
    pub date: String,
    pub session: String,
    #[serde(deserialize_with = "deserialize_string_or_i64")]
    pub class_id: i64,
    #[serde(deserialize_with = "deserialize_string_or_i64")]
    pub subject_id: i64,
    #[serde(default)]
    pub student_ids: Vec<i64>,
}

// 班级花名册查询参数
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct RosterQuery {
    pub date: Option<String>,
    pub session: Option<String>,
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub present_only: bool,
}
