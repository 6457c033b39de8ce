use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::ApiResponse;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::services::{storage_error_response, validation_response};
use crate::utils::validate::validate_person_name;

pub async fn create_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    mut teacher_data: CreateTeacherRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_person_name("firstName", &teacher_data.first_name)
        .and_then(|_| validate_person_name("lastName", &teacher_data.last_name))
    {
        return Ok(validation_response(msg));
    }
    teacher_data.first_name = teacher_data.first_name.trim().to_string();
    teacher_data.last_name = teacher_data.last_name.trim().to_string();

    match storage.create_teacher(teacher_data).await {
        Ok(teacher) => {
            info!(
                "Teacher {} created with id {}",
                teacher.full_name(), teacher.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                teacher,
                "Teacher created successfully",
            )))
        }
        Err(e) => Ok(storage_error_response("Create teacher", e)),
    }
}
