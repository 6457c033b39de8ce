use actix_web::middleware::Condition;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::config::AppConfig;
use crate::middlewares;
use crate::models::auth::LoginRequest;
use crate::models::teachers::requests::{
    CreateTeacherRequest, MarkAbsencesRequest, RosterQuery, UpdateTeacherRequest,
};
use crate::services::TeacherService;
use crate::utils::{SafeClassIdI64, SafeIDI64};

// 懒加载的全局 TEACHER_SERVICE 实例
static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

// HTTP处理程序
pub async fn list_teachers(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_teachers(&req).await
}

pub async fn create_teacher(
    req: HttpRequest,
    teacher_data: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .create_teacher(&req, teacher_data.into_inner())
        .await
}

pub async fn get_teacher(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_teacher(&req, id.0).await
}

pub async fn update_teacher(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .update_teacher(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_teacher(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.delete_teacher(&req, id.0).await
}

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.login(&req, login_data.into_inner()).await
}

pub async fn list_classes(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_classes(&req, id.0).await
}

pub async fn class_roster(
    req: HttpRequest,
    id: SafeIDI64,
    class_id: SafeClassIdI64,
    query: web::Query<RosterQuery>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .class_roster(&req, id.0, class_id.0, query.into_inner())
        .await
}

pub async fn mark_absences(
    req: HttpRequest,
    id: SafeIDI64,
    mark_data: web::Json<MarkAbsencesRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .mark_absences(&req, id.0, mark_data.into_inner())
        .await
}

pub async fn list_absences(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_absences(&req, id.0).await
}

// 配置路由
pub fn configure_teachers_routes(cfg: &mut web::ServiceConfig) {
    let require_token = AppConfig::get().auth.require_token;

    cfg.service(
        web::scope("/api/teachers")
            .service(
                web::resource("")
                    .route(web::get().to(list_teachers))
                    .route(web::post().to(create_teacher)),
            )
            // 必须在 /{id} 之前注册
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_teacher))
                    .route(web::put().to(update_teacher))
                    .route(web::delete().to(delete_teacher)),
            )
            // 以下接口在启用 auth.require_token 时需要本人令牌
            .service(
                web::resource("/{id}/classes")
                    .wrap(Condition::new(require_token, middlewares::RequireTeacherToken))
                    .route(web::get().to(list_classes)),
            )
            .service(
                web::resource("/{id}/classes/{class_id}/students")
                    .wrap(Condition::new(require_token, middlewares::RequireTeacherToken))
                    .route(web::get().to(class_roster)),
            )
            .service(
                web::resource("/{id}/mark-absences")
                    .wrap(Condition::new(require_token, middlewares::RequireTeacherToken))
                    .route(web::post().to(mark_absences)),
            )
            .service(
                web::resource("/{id}/absences")
                    .wrap(Condition::new(require_token, middlewares::RequireTeacherToken))
                    .route(web::get().to(list_absences)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::NewAssignment;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::services::test_support::{Fixture, memory_storage};
    use crate::storage::Storage;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    macro_rules! teacher_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($storage.clone()))
                    .configure(configure_teachers_routes),
            )
            .await
        };
    }

    async fn setup() -> (Arc<dyn Storage>, Fixture) {
        let storage = memory_storage().await;
        let fixture = Fixture::build(storage.as_ref()).await;
        (storage, fixture)
    }

    #[actix_web::test]
    async fn test_admin_login_any_case() {
        let (storage, _) = setup().await;
        let app = teacher_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/teachers/login")
            .set_json(json!({"username": "ADMIN", "password": "Admin"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["teacher"]["isAdmin"], true);
        assert_eq!(body["data"]["teacher"]["id"], 0);
        assert_eq!(body["data"]["teacher"]["firstName"], "Admin");
        assert_eq!(body["data"]["subjects"].as_array().unwrap().len(), 0);
        assert!(body["data"]["accessToken"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_teacher_login_groups_subjects() {
        let (storage, fixture) = setup().await;
        // 同一科目在两个班级任课
        let other_class = storage
            .create_class(crate::models::classes::requests::CreateClassRequest {
                name: "5A".into(),
                description: None,
            })
            .await
            .unwrap();
        for class_id in [fixture.class.id, other_class.id, fixture.class.id] {
            storage
                .create_assignment(NewAssignment {
                    teacher_id: fixture.teacher.id,
                    subject_id: fixture.subject.id,
                    class_id,
                    academic_period: "2024-T1".into(),
                })
                .await
                .unwrap();
        }
        let app = teacher_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/teachers/login")
            .set_json(json!({"username": "jean", "password": "MARTIN"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["teacher"]["id"], fixture.teacher.id);
        assert_eq!(body["data"]["teacher"]["isAdmin"], false);

        let subjects = body["data"]["subjects"].as_array().unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0]["subjectName"], "Mathematics");
        let classes = subjects[0]["classes"].as_array().unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0]["className"], "6B");
        assert_eq!(classes[1]["className"], "5A");
    }

    #[actix_web::test]
    async fn test_login_failures() {
        let (storage, _) = setup().await;
        let app = teacher_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/teachers/login")
            .set_json(json!({"username": "Jean", "password": "Dupont"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/teachers/login")
            .set_json(json!({"username": "Jean"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_login_after_padded_create() {
        let (storage, _) = setup().await;
        let app = teacher_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/teachers")
            .set_json(json!({"firstName": "Paul ", "lastName": " Durand"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["firstName"], "Paul");
        assert_eq!(body["data"]["lastName"], "Durand");
        let teacher_id = body["data"]["id"].clone();

        let req = test::TestRequest::post()
            .uri("/api/teachers/login")
            .set_json(json!({"username": "paul", "password": " DURAND "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["teacher"]["id"], teacher_id);

        // 非 ASCII 姓名同样大小写不敏感
        let req = test::TestRequest::post()
            .uri("/api/teachers")
            .set_json(json!({"firstName": "Éloïse", "lastName": "Lefèvre"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/teachers/login")
            .set_json(json!({"username": "ÉLOÏSE", "password": "lefèvre"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_mark_absences_records_rows() {
        let (storage, fixture) = setup().await;
        let app = teacher_app!(storage);

        let req = test::TestRequest::post()
            .uri(&format!("/api/teachers/{}/mark-absences", fixture.teacher.id))
            .set_json(json!({
                "date": "2024-01-10",
                "session": "Morning",
                "classId": fixture.class.id,
                "subjectId": fixture.subject.id.to_string(),
                "studentIds": fixture.student_ids(),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["count"], 3);
        assert_eq!(body["data"]["date"], "2024-01-10");
        assert_eq!(body["data"]["session"], "Morning");

        let absences = storage.list_absences().await.unwrap();
        assert_eq!(absences.len(), 3);
        assert!(absences.iter().all(|a| !a.is_justified));

        // 教师缺勤历史
        let req = test::TestRequest::get()
            .uri(&format!("/api/teachers/{}/absences", fixture.teacher.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        for item in items {
            assert_eq!(item["date"], "2024-01-10");
            assert_eq!(item["session"], "Morning");
            assert_eq!(item["subjectName"], "Mathematics");
            assert_eq!(item["className"], "6B");
        }
        let names: Vec<&str> = items
            .iter()
            .filter_map(|i| i["studentName"].as_str())
            .collect();
        assert!(names.contains(&"Alice Durand"));
        assert!(names.contains(&"Chloe Moreau"));

        // 任课分配已自动创建
        let req = test::TestRequest::get()
            .uri(&format!("/api/teachers/{}/classes", fixture.teacher.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let classes = body["data"].as_array().unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0]["classId"], fixture.class.id);
        assert_eq!(classes[0]["subjectName"], "Mathematics");
    }

    #[actix_web::test]
    async fn test_mark_absences_validation() {
        let (storage, fixture) = setup().await;
        let app = teacher_app!(storage);
        let uri = format!("/api/teachers/{}/mark-absences", fixture.teacher.id);

        let cases = [
            // 学生列表为空
            json!({"date": "2024-01-10", "session": "Morning", "classId": fixture.class.id,
                   "subjectId": fixture.subject.id, "studentIds": []}),
            // 日期无效
            json!({"date": "10/01/2024", "session": "Morning", "classId": fixture.class.id,
                   "subjectId": fixture.subject.id, "studentIds": fixture.student_ids()}),
            // 时段无效
            json!({"date": "2024-01-10", "session": "Evening", "classId": fixture.class.id,
                   "subjectId": fixture.subject.id, "studentIds": fixture.student_ids()}),
            // 未知学生
            json!({"date": "2024-01-10", "session": "Morning", "classId": fixture.class.id,
                   "subjectId": fixture.subject.id, "studentIds": [fixture.students[0].id, 9999]}),
        ];

        for payload in cases {
            let req = test::TestRequest::post()
                .uri(&uri)
                .set_json(&payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {payload}");
        }

        assert_eq!(storage.count_absences().await.unwrap(), 0);

        // 学生不在该班级
        let other_class = storage
            .create_class(crate::models::classes::requests::CreateClassRequest {
                name: "4C".into(),
                description: None,
            })
            .await
            .unwrap();
        let outsider = storage
            .create_student(crate::models::students::requests::CreateStudentRequest {
                first_name: "Hugo".into(),
                last_name: "Roux".into(),
                class_id: Some(other_class.id),
            })
            .await
            .unwrap();
        let req = test::TestRequest::post()
            .uri(&uri)
            .set_json(json!({
                "date": "2024-01-10",
                "session": "Morning",
                "classId": fixture.class.id,
                "subjectId": fixture.subject.id,
                "studentIds": [fixture.students[0].id, outsider.id],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains(&outsider.id.to_string())
        );
        assert_eq!(storage.count_absences().await.unwrap(), 0);

        // 教师不存在
        let req = test::TestRequest::post()
            .uri("/api/teachers/9999/mark-absences")
            .set_json(json!({
                "date": "2024-01-10",
                "session": "Morning",
                "classId": fixture.class.id,
                "subjectId": fixture.subject.id,
                "studentIds": fixture.student_ids(),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_unassigned_teacher_is_forbidden() {
        let (storage, fixture) = setup().await;
        let app = teacher_app!(storage);

        let req = test::TestRequest::post()
            .uri(&format!(
                "/api/teachers/{}/mark-absences",
                fixture.other_teacher.id
            ))
            .set_json(json!({
                "date": "2024-01-10",
                "session": "Afternoon",
                "classId": fixture.class.id,
                "subjectId": fixture.subject.id,
                "studentIds": fixture.student_ids(),
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(storage.count_absences().await.unwrap(), 0);

        // 未授权时不暴露学生是否存在
        let req = test::TestRequest::post()
            .uri(&format!(
                "/api/teachers/{}/mark-absences",
                fixture.other_teacher.id
            ))
            .set_json(json!({
                "date": "2024-01-10",
                "session": "Afternoon",
                "classId": fixture.class.id,
                "subjectId": fixture.subject.id,
                "studentIds": [9999],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/teachers/{}/classes/{}/students",
                fixture.other_teacher.id, fixture.class.id
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_roster_flags_absent_students() {
        let (storage, fixture) = setup().await;
        // 另一名教师拥有同班的另一科目，但没有标记缺勤
        storage
            .create_subject(CreateSubjectRequest {
                name: "History".into(),
                teacher_id: fixture.other_teacher.id,
                class_id: fixture.class.id,
            })
            .await
            .unwrap();
        let app = teacher_app!(storage);

        let absent_id = fixture.students[1].id;
        let req = test::TestRequest::post()
            .uri(&format!("/api/teachers/{}/mark-absences", fixture.teacher.id))
            .set_json(json!({
                "date": "2024-01-10",
                "session": "morning",
                "classId": fixture.class.id,
                "subjectId": fixture.subject.id,
                "studentIds": [absent_id],
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let base = format!(
            "/api/teachers/{}/classes/{}/students",
            fixture.teacher.id, fixture.class.id
        );

        let req = test::TestRequest::get()
            .uri(&format!(
                "{base}?date=2024-01-10&session=Morning&subjectId={}",
                fixture.subject.id
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let roster = body["data"].as_array().unwrap();
        assert_eq!(roster.len(), 3);
        for entry in roster {
            assert_eq!(entry["isAbsent"], entry["id"] == absent_id);
        }

        // 其他时段没有缺勤
        let req = test::TestRequest::get()
            .uri(&format!(
                "{base}?date=2024-01-10&session=Afternoon&subjectId={}",
                fixture.subject.id
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(
            body["data"]
                .as_array()
                .unwrap()
                .iter()
                .all(|e| e["isAbsent"] == false)
        );

        let req = test::TestRequest::get()
            .uri(&format!(
                "{base}?date=2024-01-10&session=Morning&subjectId={}&presentOnly=true",
                fixture.subject.id
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let roster = body["data"].as_array().unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.iter().all(|e| e["id"] != absent_id));

        // 另一名教师通过自己的科目也能查看花名册
        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/teachers/{}/classes/{}/students",
                fixture.other_teacher.id, fixture.class.id
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("{base}?date=yesterday"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_teacher_crud() {
        let (storage, fixture) = setup().await;
        let app = teacher_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/teachers")
            .set_json(json!({"firstName": "Hélène", "lastName": "Lefèvre"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::get().uri("/api/teachers").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::put()
            .uri(&format!("/api/teachers/{}", fixture.teacher.id))
            .set_json(json!({"firstName": "Jean", "lastName": "Martin", "version": 42}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/teachers/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/teachers/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
