use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::ApiResponse;
use crate::services::storage_error_response;
use crate::services::teachers::ensure_teacher_exists;

pub async fn list_subjects(
    service: &SubjectService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_subjects().await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subjects,
            "Subjects retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("List subjects", e)),
    }
}

// 教师名下的科目
pub async fn list_teacher_subjects(
    service: &SubjectService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_teacher_exists(storage.as_ref(), teacher_id).await {
        return Ok(resp);
    }

    match storage.list_subjects_by_teacher(teacher_id).await {
        Ok(subjects) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            subjects,
            "Teacher subjects retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("List teacher subjects", e)),
    }
}
