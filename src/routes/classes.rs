use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::classes::requests::{
    AssignTeacherRequest, CreateClassRequest, UpdateClassRequest,
};
use crate::services::ClassService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req, id.0).await
}

pub async fn assign_teacher(
    req: HttpRequest,
    assign_data: web::Json<AssignTeacherRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .assign_teacher(&req, assign_data.into_inner())
        .await
}

pub async fn add_students(
    req: HttpRequest,
    id: SafeIDI64,
    student_ids: web::Json<Vec<i64>>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .add_students(&req, id.0, student_ids.into_inner())
        .await
}

pub async fn list_class_students(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_class_students(&req, id.0).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/classes")
            .service(
                web::resource("")
                    .route(web::get().to(list_classes))
                    .route(web::post().to(create_class)),
            )
            // 必须在 /{id} 之前注册
            .service(web::resource("/assign-teacher").route(web::post().to(assign_teacher)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_class))
                    .route(web::put().to(update_class))
                    .route(web::delete().to(delete_class)),
            )
            .service(web::resource("/{id}/add-students").route(web::post().to(add_students)))
            .service(web::resource("/{id}/students").route(web::get().to(list_class_students))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{Fixture, memory_storage};
    use crate::storage::Storage;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    macro_rules! class_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($storage.clone()))
                    .configure(configure_classes_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_delete_class() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let app = class_app!(storage);

        let req = test::TestRequest::delete()
            .uri("/api/classes/9999")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/classes/{}", fixture.class.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get().uri("/api/classes").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(
            body["data"]
                .as_array()
                .unwrap()
                .iter()
                .all(|c| c["id"] != fixture.class.id)
        );

        // 学生保留，班级置空
        let student = storage
            .get_student_by_id(fixture.students[0].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(student.class_id, None);
    }

    #[actix_web::test]
    async fn test_class_detail_and_students() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let app = class_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/classes/assign-teacher")
            .set_json(json!({
                "teacherId": fixture.teacher.id,
                "subjectId": fixture.subject.id,
                "classId": fixture.class.id,
                "academicPeriod": "2024-T1",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri(&format!("/api/classes/{}", fixture.class.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["name"], "6B");
        assert_eq!(body["data"]["students"].as_array().unwrap().len(), 3);
        let assignments = body["data"]["assignments"].as_array().unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0]["teacherName"], "Jean Martin");
        assert_eq!(assignments[0]["subjectName"], "Mathematics");
        assert_eq!(assignments[0]["academicPeriod"], "2024-T1");

        let req = test::TestRequest::get()
            .uri(&format!("/api/classes/{}/students", fixture.class.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::get()
            .uri("/api/classes/9999/students")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_assign_teacher_validation() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let app = class_app!(storage);

        let cases = [
            json!({"teacherId": 9999, "subjectId": fixture.subject.id,
                   "classId": fixture.class.id, "academicPeriod": "2024-T1"}),
            json!({"teacherId": fixture.teacher.id, "subjectId": 9999,
                   "classId": fixture.class.id, "academicPeriod": "2024-T1"}),
            json!({"teacherId": fixture.teacher.id, "subjectId": fixture.subject.id,
                   "classId": 9999, "academicPeriod": "2024-T1"}),
            json!({"teacherId": fixture.teacher.id, "subjectId": fixture.subject.id,
                   "classId": fixture.class.id, "academicPeriod": "   "}),
        ];

        for payload in cases {
            let req = test::TestRequest::post()
                .uri("/api/classes/assign-teacher")
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        }
    }

    #[actix_web::test]
    async fn test_add_students_ignores_unknown_ids() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let app = class_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/classes")
            .set_json(json!({"name": "5A"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let new_class_id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/classes/{new_class_id}/add-students"))
            .set_json(json!([fixture.students[0].id, fixture.students[2].id, 9999]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["count"], 2);

        let moved = storage.list_students_by_class(new_class_id).await.unwrap();
        assert_eq!(moved.len(), 2);

        let req = test::TestRequest::post()
            .uri("/api/classes/9999/add-students")
            .set_json(json!([fixture.students[1].id]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_update_class() {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        let app = class_app!(storage);

        let req = test::TestRequest::put()
            .uri(&format!("/api/classes/{}", fixture.class.id))
            .set_json(json!({"name": "6B bis", "version": fixture.class.version}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri(&format!("/api/classes/{}", fixture.class.id))
            .set_json(json!({"name": "6C", "version": fixture.class.version}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::put()
            .uri("/api/classes/9999")
            .set_json(json!({"name": "6C"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/classes")
            .set_json(json!({"name": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
