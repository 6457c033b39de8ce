use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::assignments::requests::NewAssignment;
use crate::models::classes::requests::AssignTeacherRequest;
use crate::services::{invalid_reference_response, storage_error_response, validation_response};
use crate::utils::validate::validate_required_text;

pub async fn assign_teacher(
    service: &ClassService,
    request: &HttpRequest,
    assign_data: AssignTeacherRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_required_text("academicPeriod", &assign_data.academic_period) {
        return Ok(validation_response(msg));
    }
    let academic_period = assign_data.academic_period.trim().to_string();

    match storage.get_teacher_by_id(assign_data.teacher_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(invalid_reference_response(format!(
                "Teacher {} does not exist",
                assign_data.teacher_id
            )));
        }
        Err(e) => return Ok(storage_error_response("Check teacher", e)),
    }

    match storage.get_subject_by_id(assign_data.subject_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(invalid_reference_response(format!(
                "Subject {} does not exist",
                assign_data.subject_id
            )));
        }
        Err(e) => return Ok(storage_error_response("Check subject", e)),
    }

    match storage.get_class_by_id(assign_data.class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(invalid_reference_response(format!(
                "Class {} does not exist",
                assign_data.class_id
            )));
        }
        Err(e) => return Ok(storage_error_response("Check class", e)),
    }

    let new_assignment = NewAssignment {
        teacher_id: assign_data.teacher_id,
        subject_id: assign_data.subject_id,
        class_id: assign_data.class_id,
        academic_period,
    };

    match storage.create_assignment(new_assignment).await {
        Ok(assignment) => {
            info!(
                "Teacher {} assigned to subject {} in class {} ({})",
                assignment.teacher_id,
                assignment.subject_id,
                assignment.class_id,
                assignment.academic_period
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Teacher assigned successfully",
            )))
        }
        Err(e) => Ok(storage_error_response("Assign teacher", e)),
    }
}
