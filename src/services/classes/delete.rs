use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, class_not_found};
use crate::services::storage_error_response;

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 学生的 class_id 置空，科目与任课分配级联删除
    match storage.delete_class(class_id).await {
        Ok(true) => {
            info!("Class {} deleted", class_id);
            Ok(HttpResponse::NoContent().finish())
        }
        Ok(false) => Ok(class_not_found()),
        Err(e) => Ok(storage_error_response("Delete class", e)),
    }
}
