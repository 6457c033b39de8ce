use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TeacherService, ensure_teacher_exists};
use crate::models::ApiResponse;
use crate::services::storage_error_response;

pub async fn list_teacher_absences(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_teacher_exists(storage.as_ref(), teacher_id).await {
        return Ok(resp);
    }

    match storage.list_teacher_absences(teacher_id).await {
        Ok(absences) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            absences,
            "Teacher absences retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("List teacher absences", e)),
    }
}
