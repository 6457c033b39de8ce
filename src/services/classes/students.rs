use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, class_not_found};
use crate::models::ApiResponse;
use crate::models::students::responses::{StudentCountResponse, StudentSummary};
use crate::services::storage_error_response;

// 未知的学生 ID 直接忽略
pub async fn add_students(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    student_ids: Vec<i64>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(class_not_found()),
        Err(e) => return Ok(storage_error_response("Get class", e)),
    }

    match storage.move_students_to_class(class_id, &student_ids).await {
        Ok(count) => {
            info!("Moved {} students into class {}", count, class_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentCountResponse { count },
                "Students added to class",
            )))
        }
        Err(e) => Ok(storage_error_response("Add students to class", e)),
    }
}

pub async fn list_class_students(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(class_not_found()),
        Err(e) => return Ok(storage_error_response("Get class", e)),
    }

    match storage.list_students_by_class(class_id).await {
        Ok(students) => {
            let students: Vec<StudentSummary> = students.iter().map(StudentSummary::from).collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                students,
                "Class students retrieved successfully",
            )))
        }
        Err(e) => Ok(storage_error_response("List class students", e)),
    }
}
