pub mod absences;
pub mod classes;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod login;
pub mod mark_absences;
pub mod roster;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::LoginRequest;
use crate::models::teachers::requests::{
    CreateTeacherRequest, MarkAbsencesRequest, RosterQuery, UpdateTeacherRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

use super::storage_error_response;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn list_teachers(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_teachers(self, request).await
    }

    pub async fn get_teacher(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        get::get_teacher(self, request, id).await
    }

    pub async fn create_teacher(
        &self,
        request: &HttpRequest,
        teacher_data: CreateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, request, teacher_data).await
    }

    pub async fn update_teacher(
        &self,
        request: &HttpRequest,
        id: i64,
        update_data: UpdateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, request, id, update_data).await
    }

    pub async fn delete_teacher(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, request, id).await
    }

    // 教师登录
    pub async fn login(
        &self,
        request: &HttpRequest,
        login_request: LoginRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 教师任课班级
    pub async fn list_classes(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        classes::list_teacher_classes(self, request, id).await
    }

    // 班级花名册
    pub async fn class_roster(
        &self,
        request: &HttpRequest,
        id: i64,
        class_id: i64,
        query: RosterQuery,
    ) -> ActixResult<HttpResponse> {
        roster::class_roster(self, request, id, class_id, query).await
    }

    // 批量标记缺勤
    pub async fn mark_absences(
        &self,
        request: &HttpRequest,
        id: i64,
        mark_data: MarkAbsencesRequest,
    ) -> ActixResult<HttpResponse> {
        mark_absences::mark_absences(self, request, id, mark_data).await
    }

    // 教师缺勤记录
    pub async fn list_absences(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        absences::list_teacher_absences(self, request, id).await
    }
}

/// 确认教师存在，不存在时返回 404 响应
pub(crate) async fn ensure_teacher_exists(
    storage: &dyn Storage,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TeacherNotFound,
            "Teacher not found",
        ))),
        Err(e) => Err(storage_error_response("Get teacher", e)),
    }
}
