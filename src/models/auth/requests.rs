use serde::Deserialize;
use ts_rs::TS;

// 教师登录请求
//
// username 对应教师的名，password 对应教师的姓，均不区分大小写。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
