use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::ApiResponse;
use crate::models::classes::requests::CreateClassRequest;
use crate::services::{storage_error_response, validation_response};
use crate::utils::validate::validate_required_text;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_required_text("name", &class_data.name) {
        return Ok(validation_response(msg));
    }
    class_data.name = class_data.name.trim().to_string();

    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class '{}' created with id {}", class.name, class.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                class,
                "Class created successfully",
            )))
        }
        Err(e) => Ok(storage_error_response("Create class", e)),
    }
}
