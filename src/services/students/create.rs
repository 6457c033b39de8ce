use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::students::{requests::CreateStudentRequest, responses::StudentResponse};
use crate::models::{ApiResponse, classes::entities::ClassSummary};
use crate::services::{invalid_reference_response, storage_error_response, validation_response};
use crate::storage::Storage;
use crate::utils::validate::validate_person_name;

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    mut student_data: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(msg) = validate_person_name("firstName", &student_data.first_name)
        .and_then(|_| validate_person_name("lastName", &student_data.last_name))
    {
        return Ok(validation_response(msg));
    }
    student_data.first_name = student_data.first_name.trim().to_string();
    student_data.last_name = student_data.last_name.trim().to_string();

    // 班级必须存在
    let class = match resolve_class(&storage, student_data.class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    match storage.create_student(student_data).await {
        Ok(student) => {
            info!(
                "Student {} created with id {}",
                student.full_name(), student.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { student, class },
                "Student created successfully",
            )))
        }
        Err(e) => Ok(storage_error_response("Create student", e)),
    }
}

/// 校验学生所属班级，返回班级摘要
pub(super) async fn resolve_class(
    storage: &Arc<dyn Storage>,
    class_id: Option<i64>,
) -> Result<Option<ClassSummary>, HttpResponse> {
    let Some(class_id) = class_id else {
        return Ok(None);
    };

    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(Some(ClassSummary::from(&class))),
        Ok(None) => Err(invalid_reference_response(format!(
            "Class {class_id} does not exist"
        ))),
        Err(e) => Err(storage_error_response("Check class", e)),
    }
}
