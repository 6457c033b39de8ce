use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AbsenceService;
use crate::models::absences::requests::{CreateAbsenceRequest, NewAbsence};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{invalid_reference_response, storage_error_response};
use crate::utils::date::{date_to_timestamp, parse_absence_date, parse_session};

pub async fn create_absence(
    service: &AbsenceService,
    request: &HttpRequest,
    absence_data: CreateAbsenceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let date = match parse_absence_date(&absence_data.date) {
        Ok(date) => date,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidDate,
                e.message(),
            )));
        }
    };

    let session = match parse_session(&absence_data.session) {
        Ok(session) => session,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidSession,
                e.message(),
            )));
        }
    };

    match storage.get_student_by_id(absence_data.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(invalid_reference_response(format!(
                "Student {} does not exist",
                absence_data.student_id
            )));
        }
        Err(e) => return Ok(storage_error_response("Check student", e)),
    }

    match storage
        .get_assignment_by_id(absence_data.teacher_subject_class_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(invalid_reference_response(format!(
                "Assignment {} does not exist",
                absence_data.teacher_subject_class_id
            )));
        }
        Err(e) => return Ok(storage_error_response("Check assignment", e)),
    }

    let new_absence = NewAbsence {
        date: date_to_timestamp(date),
        session,
        student_id: absence_data.student_id,
        teacher_subject_class_id: absence_data.teacher_subject_class_id,
        is_justified: absence_data.is_justified,
        justification_note: absence_data
            .justification_note
            .map(|note| note.trim().to_string())
            .filter(|note| !note.is_empty()),
    };

    match storage.create_absence(new_absence).await {
        Ok(absence) => {
            info!(
                "Absence {} recorded for student {} on {} {}",
                absence.id, absence.student_id, absence.date, absence.session
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                absence,
                "Absence created successfully",
            )))
        }
        Err(e) => Ok(storage_error_response("Create absence", e)),
    }
}
