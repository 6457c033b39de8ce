use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubjectService, check_subject_references};
use crate::models::ApiResponse;
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::services::{storage_error_response, validation_response};
use crate::utils::validate::validate_required_text;

pub async fn create_subject(
    service: &SubjectService,
    request: &HttpRequest,
    mut subject_data: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_required_text("name", &subject_data.name) {
        return Ok(validation_response(msg));
    }
    subject_data.name = subject_data.name.trim().to_string();

    let (teacher_id, class_id) = (subject_data.teacher_id, subject_data.class_id);
    if let Err(resp) = check_subject_references(storage.as_ref(), teacher_id, class_id).await {
        return Ok(resp);
    }

    match storage.create_subject(subject_data).await {
        Ok(subject) => {
            info!(
                "Subject '{}' created with id {} (teacher {}, class {})",
                subject.name, subject.id, subject.teacher_id, subject.class_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                subject,
                "Subject created successfully",
            )))
        }
        Err(e) => Ok(storage_error_response("Create subject", e)),
    }
}
