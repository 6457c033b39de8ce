use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use super::create::resolve_class;
use crate::models::students::{requests::UpdateStudentRequest, responses::StudentResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{id_mismatch_response, storage_error_response, validation_response};
use crate::utils::validate::validate_person_name;

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
    mut update_data: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(body_id) = update_data.id
        && body_id != id
    {
        return Ok(id_mismatch_response(id, body_id));
    }

    if let Err(msg) = validate_person_name("firstName", &update_data.first_name)
        .and_then(|_| validate_person_name("lastName", &update_data.last_name))
    {
        return Ok(validation_response(msg));
    }
    update_data.first_name = update_data.first_name.trim().to_string();
    update_data.last_name = update_data.last_name.trim().to_string();

    let existing = match storage.get_student_by_id(id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("Get student", e)),
    };

    let class = match resolve_class(&storage, update_data.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    let expected_version = update_data.version.unwrap_or(existing.version);
    match storage.update_student(id, update_data, expected_version).await {
        Ok(Some(student)) => {
            info!(
                "Student {} updated to version {}",
                student.id, student.version
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentResponse { student, class },
                "Student updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(storage_error_response("Update student", e)),
    }
}
