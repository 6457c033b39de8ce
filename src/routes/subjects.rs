use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::subjects::requests::{CreateSubjectRequest, UpdateSubjectRequest};
use crate::services::SubjectService;
use crate::utils::{SafeIDI64, SafeTeacherIdI64};

// 懒加载的全局 SUBJECT_SERVICE 实例
static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

// HTTP处理程序
pub async fn list_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(&req).await
}

pub async fn create_subject(
    req: HttpRequest,
    subject_data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .create_subject(&req, subject_data.into_inner())
        .await
}

pub async fn get_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_subject(&req, id.0).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(&req, id.0).await
}

pub async fn list_teacher_subjects(
    req: HttpRequest,
    teacher_id: SafeTeacherIdI64,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .list_teacher_subjects(&req, teacher_id.0)
        .await
}

// 配置路由
pub fn configure_subjects_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/subjects")
            .service(
                web::resource("")
                    .route(web::get().to(list_subjects))
                    .route(web::post().to(create_subject)),
            )
            .service(
                web::resource("/teacher/{teacher_id}")
                    .route(web::get().to(list_teacher_subjects)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_subject))
                    .route(web::put().to(update_subject))
                    .route(web::delete().to(delete_subject)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{Fixture, memory_storage};
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn test_subject_views_include_names() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_subjects_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/subjects/{}", fixture.subject.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "Mathematics");
        assert_eq!(body["data"]["teacherName"], "Jean Martin");
        assert_eq!(body["data"]["className"], "6B");

        let req = test::TestRequest::get()
            .uri(&format!("/api/subjects/teacher/{}", fixture.teacher.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["className"], "6B");

        let req = test::TestRequest::get()
            .uri(&format!("/api/subjects/teacher/{}", fixture.other_teacher.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"].as_array().unwrap().is_empty());

        let req = test::TestRequest::get()
            .uri("/api/subjects/teacher/9999")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_subject_write_paths() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_subjects_routes),
        )
        .await;

        // 教师不存在
        let req = test::TestRequest::post()
            .uri("/api/subjects")
            .set_json(json!({"name": "Physics", "teacherId": 9999, "classId": fixture.class.id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/subjects")
            .set_json(json!({"name": "Physics", "teacherId": fixture.other_teacher.id,
                             "classId": fixture.class.id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/subjects/{id}"))
            .set_json(json!({"id": id, "name": "Physics & Chemistry",
                             "teacherId": fixture.other_teacher.id, "classId": fixture.class.id,
                             "version": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri(&format!("/api/subjects/{id}"))
            .set_json(json!({"name": "Physics", "teacherId": fixture.other_teacher.id,
                             "classId": fixture.class.id, "version": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/subjects/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/subjects/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
