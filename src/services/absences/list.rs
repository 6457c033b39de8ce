use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AbsenceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

pub async fn list_absences(
    service: &AbsenceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_absences().await {
        Ok(absences) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            absences,
            "Absences retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("List absences", e)),
    }
}

pub async fn list_student_absences(
    service: &AbsenceService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_student_by_id(student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("Get student", e)),
    }

    match storage.list_student_absences(student_id).await {
        Ok(absences) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            absences,
            "Student absences retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("List student absences", e)),
    }
}
