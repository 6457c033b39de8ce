use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, class_not_found};
use crate::models::ApiResponse;
use crate::models::classes::requests::UpdateClassRequest;
use crate::services::{id_mismatch_response, storage_error_response, validation_response};
use crate::utils::validate::validate_required_text;

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    mut update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(body_id) = update_data.id
        && body_id != class_id
    {
        return Ok(id_mismatch_response(class_id, body_id));
    }

    if let Err(msg) = validate_required_text("name", &update_data.name) {
        return Ok(validation_response(msg));
    }
    update_data.name = update_data.name.trim().to_string();

    // 未携带版本号时以当前版本为准
    let expected_version = match update_data.version {
        Some(version) => version,
        None => match storage.get_class_by_id(class_id).await {
            Ok(Some(class)) => class.version,
            Ok(None) => return Ok(class_not_found()),
            Err(e) => return Ok(storage_error_response("Get class", e)),
        },
    };

    match storage
        .update_class(class_id, update_data, expected_version)
        .await
    {
        Ok(Some(class)) => {
            info!("Class {} updated to version {}", class.id, class.version);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                class,
                "Class updated successfully",
            )))
        }
        Ok(None) => Ok(class_not_found()),
        Err(e) => Ok(storage_error_response("Update class", e)),
    }
}
