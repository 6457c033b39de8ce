use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::dashboard::responses::DashboardStats;
use crate::services::storage_error_response;
use crate::storage::Storage;

async fn collect_stats(storage: &dyn Storage) -> Result<DashboardStats> {
    Ok(DashboardStats {
        total_students: storage.count_students().await?,
        total_teachers: storage.count_teachers().await?,
        total_classes: storage.count_classes().await?,
        total_subjects: storage.count_subjects().await?,
        total_absences: storage.count_absences().await?,
    })
}

pub async fn get_stats(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match collect_stats(storage.as_ref()).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Dashboard statistics retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response("Load dashboard statistics", e)),
    }
}
