use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::absences::requests::{CreateAbsenceRequest, JustifyAbsenceRequest};
use crate::services::AbsenceService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ABSENCE_SERVICE 实例
static ABSENCE_SERVICE: Lazy<AbsenceService> = Lazy::new(AbsenceService::new_lazy);

// HTTP处理程序
pub async fn list_absences(req: HttpRequest) -> ActixResult<HttpResponse> {
    ABSENCE_SERVICE.list_absences(&req).await
}

pub async fn create_absence(
    req: HttpRequest,
    absence_data: web::Json<CreateAbsenceRequest>,
) -> ActixResult<HttpResponse> {
    ABSENCE_SERVICE
        .create_absence(&req, absence_data.into_inner())
        .await
}

pub async fn list_student_absences(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ABSENCE_SERVICE.list_student_absences(&req, id.0).await
}

pub async fn justify_absence(
    req: HttpRequest,
    id: SafeIDI64,
    justify_data: web::Json<JustifyAbsenceRequest>,
) -> ActixResult<HttpResponse> {
    ABSENCE_SERVICE
        .justify_absence(&req, id.0, justify_data.into_inner())
        .await
}

pub async fn delete_absence(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ABSENCE_SERVICE.delete_absence(&req, id.0).await
}

// 配置路由
pub fn configure_absences_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/absences")
            .service(
                web::resource("")
                    .route(web::get().to(list_absences))
                    .route(web::post().to(create_absence)),
            )
            .service(web::resource("/student/{id}").route(web::get().to(list_student_absences)))
            .service(web::resource("/{id}").route(web::delete().to(delete_absence)))
            .service(web::resource("/{id}/justification").route(web::put().to(justify_absence))),
    );
}
