use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AbsenceService, absence_not_found};
use crate::services::storage_error_response;

pub async fn delete_absence(
    service: &AbsenceService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_absence(id).await {
        Ok(true) => {
            info!("Absence {} deleted", id);
            Ok(HttpResponse::NoContent().finish())
        }
        Ok(false) => Ok(absence_not_found()),
        Err(e) => Ok(storage_error_response("Delete absence", e)),
    }
}
