use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::students::requests::{CreateStudentRequest, UpdateStudentRequest};
use crate::services::StudentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 STUDENT_SERVICE 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

// HTTP处理程序
pub async fn list_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(&req, student_data.into_inner())
        .await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, id.0).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, id.0).await
}

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/students")
            .service(
                web::resource("")
                    .route(web::get().to(list_students))
                    .route(web::post().to(create_student)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_student))
                    .route(web::put().to(update_student))
                    .route(web::delete().to(delete_student)),
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
    async fn test_create_student_checks_class() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_students_routes),
        )
        .await;

        // 班级不存在
        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({"firstName": "Emma", "lastName": "Roux", "classId": 9999}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({"firstName": "Emma", "lastName": "Roux", "classId": fixture.class.id}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["class"]["id"], fixture.class.id);
        assert_eq!(body["data"]["class"]["name"], "6B");
        assert_eq!(body["data"]["firstName"], "Emma");
    }

    #[actix_web::test]
    async fn test_create_student_rejects_bad_name() {
        let storage = memory_storage().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_students_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({"firstName": "  ", "lastName": "Roux"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_update_student_version_and_id_checks() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let student = &fixture.students[0];
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_students_routes),
        )
        .await;

        // 路径与请求体 ID 不一致
        let req = test::TestRequest::put()
            .uri(&format!("/api/students/{}", student.id))
            .set_json(json!({"id": student.id + 100, "firstName": "Alice", "lastName": "Durand"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&format!("/api/students/{}", student.id))
            .set_json(json!({
                "firstName": "Alicia",
                "lastName": "Durand",
                "version": student.version,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["firstName"], "Alicia");
        assert_eq!(body["data"]["version"], student.version + 1);

        // 旧版本号
        let req = test::TestRequest::put()
            .uri(&format!("/api/students/{}", student.id))
            .set_json(json!({"firstName": "Ali", "lastName": "Durand", "version": student.version}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // 已删除
        let req = test::TestRequest::delete()
            .uri(&format!("/api/students/{}", student.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::put()
            .uri(&format!("/api/students/{}", student.id))
            .set_json(json!({"firstName": "Ali", "lastName": "Durand"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_bad_path_id_is_rejected() {
        let storage = memory_storage().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_students_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/students/abc")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
