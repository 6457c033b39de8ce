use serde::{Serialize, Serializer};
use ts_rs::TS;

// 业务错误码
//
// 0 成功；1xxx 请求参数；2xxx 认证与授权；3xxx 资源不存在；
// 4xxx 冲突与限流；5xxx 服务端错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error_code.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    InvalidDate = 1002,
    InvalidSession = 1003,
    IdMismatch = 1004,
    InvalidReference = 1005,

    Unauthorized = 2000,
    AuthFailed = 2001,
    AssignmentPermissionDenied = 2002,
    TeacherTokenMismatch = 2003,

    StudentNotFound = 3001,
    TeacherNotFound = 3002,
    ClassNotFound = 3003,
    SubjectNotFound = 3004,
    AbsenceNotFound = 3005,

    ConcurrencyConflict = 4001,
    RateLimitExceeded = 4029,

    InternalServerError = 5000,
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(*self as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::InvalidSession as i32, 1003);
        assert_eq!(ErrorCode::AssignmentPermissionDenied as i32, 2002);
        assert_eq!(ErrorCode::ConcurrencyConflict as i32, 4001);
        let json = serde_json::to_string(&ErrorCode::StudentNotFound).unwrap();
        assert_eq!(json, "3001");
    }
}
