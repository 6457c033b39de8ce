pub mod absences;
pub mod authorization;
pub mod classes;
pub mod dashboard;
pub mod students;
pub mod subjects;
pub mod teachers;

#[cfg(test)]
pub(crate) mod test_support;

pub use absences::AbsenceService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use teachers::TeacherService;

use actix_web::HttpResponse;
use tracing::{error, warn};

use crate::errors::AbsenceTrackerError;
use crate::models::{ApiResponse, ErrorCode};

/// 存储层错误转换为响应：并发冲突 409，其余 500
pub(crate) fn storage_error_response(action: &str, err: AbsenceTrackerError) -> HttpResponse {
    match err {
        AbsenceTrackerError::Conflict(msg) => {
            warn!("{action} rejected: {msg}");
            HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ConcurrencyConflict,
                format!("{msg}. Reload and try again"),
            ))
        }
        other => {
            error!("{action} failed: {other}");
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{action} failed: {}", other.message()),
            ))
        }
    }
}

/// 请求体中的 id 与路径不一致
pub(crate) fn id_mismatch_response(path_id: i64, body_id: i64) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::IdMismatch,
        format!("Body id {body_id} does not match path id {path_id}"),
    ))
}

pub(crate) fn validation_response(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::ValidationFailed,
        message,
    ))
}

pub(crate) fn invalid_reference_response(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidReference,
        message,
    ))
}
