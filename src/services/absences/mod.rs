pub mod create;
pub mod delete;
pub mod justify;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::absences::requests::{CreateAbsenceRequest, JustifyAbsenceRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AbsenceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AbsenceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 全部缺勤记录，附带学生与科目
    pub async fn list_absences(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_absences(self, request).await
    }

    pub async fn list_student_absences(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_student_absences(self, request, student_id).await
    }

    pub async fn create_absence(
        &self,
        request: &HttpRequest,
        absence_data: CreateAbsenceRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_absence(self, request, absence_data).await
    }

    // 更新缺勤说明
    pub async fn justify_absence(
        &self,
        request: &HttpRequest,
        id: i64,
        justify_data: JustifyAbsenceRequest,
    ) -> ActixResult<HttpResponse> {
        justify::justify_absence(self, request, id, justify_data).await
    }

    pub async fn delete_absence(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_absence(self, request, id).await
    }
}

pub(crate) fn absence_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AbsenceNotFound,
        "Absence not found",
    ))
}
