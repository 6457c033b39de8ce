use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubjectService, check_subject_references, subject_not_found};
use crate::models::ApiResponse;
use crate::models::subjects::requests::UpdateSubjectRequest;
use crate::services::{id_mismatch_response, storage_error_response, validation_response};
use crate::utils::validate::validate_required_text;

pub async fn update_subject(
    service: &SubjectService,
    request: &HttpRequest,
    id: i64,
    mut update_data: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(body_id) = update_data.id
        && body_id != id
    {
        return Ok(id_mismatch_response(id, body_id));
    }

    if let Err(msg) = validate_required_text("name", &update_data.name) {
        return Ok(validation_response(msg));
    }
    update_data.name = update_data.name.trim().to_string();

    let existing = match storage.get_subject_by_id(id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return Ok(subject_not_found()),
        Err(e) => return Ok(storage_error_response("Get subject", e)),
    };

    let (teacher_id, class_id) = (update_data.teacher_id, update_data.class_id);
    if let Err(resp) = check_subject_references(storage.as_ref(), teacher_id, class_id).await {
        return Ok(resp);
    }

    let expected_version = update_data.version.unwrap_or(existing.version);
    match storage.update_subject(id, update_data, expected_version).await {
        Ok(Some(subject)) => {
            info!(
                "Subject {} updated to version {}",
                subject.id, subject.version
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                subject,
                "Subject updated successfully",
            )))
        }
        Ok(None) => Ok(subject_not_found()),
        Err(e) => Ok(storage_error_response("Update subject", e)),
    }
}
