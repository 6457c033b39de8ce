use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AbsenceService, absence_not_found};
use crate::models::ApiResponse;
use crate::models::absences::requests::JustifyAbsenceRequest;
use crate::services::storage_error_response;

pub async fn justify_absence(
    service: &AbsenceService,
    request: &HttpRequest,
    id: i64,
    justify_data: JustifyAbsenceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let expected_version = match justify_data.version {
        Some(version) => version,
        None => match storage.get_absence_by_id(id).await {
            Ok(Some(absence)) => absence.version,
            Ok(None) => return Ok(absence_not_found()),
            Err(e) => return Ok(storage_error_response("Get absence", e)),
        },
    };

    let note = justify_data
        .justification_note
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());

    match storage
        .update_absence_justification(id, justify_data.is_justified, note, expected_version)
        .await
    {
        Ok(Some(absence)) => {
            info!(
                "Absence {} justification set to {} (version {})",
                absence.id, absence.is_justified, absence.version
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                absence,
                "Absence updated successfully",
            )))
        }
        Ok(None) => Ok(absence_not_found()),
        Err(e) => Ok(storage_error_response("Update absence", e)),
    }
}
