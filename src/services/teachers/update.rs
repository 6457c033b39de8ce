use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::teachers::requests::UpdateTeacherRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{id_mismatch_response, storage_error_response, validation_response};
use crate::utils::validate::validate_person_name;

pub async fn update_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    id: i64,
    mut update_data: UpdateTeacherRequest,
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

    let existing = match storage.get_teacher_by_id(id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "Teacher not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("Get teacher", e)),
    };

    let expected_version = update_data.version.unwrap_or(existing.version);
    match storage.update_teacher(id, update_data, expected_version).await {
        Ok(Some(teacher)) => {
            info!(
                "Teacher {} updated to version {}",
                teacher.id, teacher.version
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                teacher,
                "Teacher updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Ok(storage_error_response("Update teacher", e)),
    }
}
