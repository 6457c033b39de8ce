//! 安全的路径参数提取器
//!
//! 路径参数无法解析为 i64 时直接返回 400 和统一错误结构，
//! 不进入处理函数。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn invalid_path_param(name: &str, raw: Option<&str>) -> actix_web::Error {
    let message = match raw {
        Some(value) => format!("Invalid path parameter '{name}': '{value}' is not a valid id"),
        None => format!("Missing path parameter '{name}'"),
    };
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

fn extract_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name);
    match raw.map(|v| v.parse::<i64>()) {
        Some(Ok(id)) => Ok(id),
        _ => Err(invalid_path_param(name, raw)),
    }
}

macro_rules! define_safe_i64_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(extract_i64(req, $param).map($name))
            }
        }
    };
}

define_safe_i64_extractor!(
    /// 通用 `{id}` 路径参数
    SafeIDI64,
    "id"
);
define_safe_i64_extractor!(
    /// `{class_id}` 路径参数
    SafeClassIdI64,
    "class_id"
);
define_safe_i64_extractor!(
    /// `{teacher_id}` 路径参数
    SafeTeacherIdI64,
    "teacher_id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    async fn echo(id: SafeIDI64) -> HttpResponse {
        HttpResponse::Ok().body(id.0.to_string())
    }

    #[actix_web::test]
    async fn test_valid_id_is_extracted() {
        let app = test::init_service(App::new().route("/items/{id}", web::get().to(echo))).await;
        let req = test::TestRequest::get().uri("/items/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(body, "42");
    }

    #[actix_web::test]
    async fn test_invalid_id_returns_bad_request() {
        let app = test::init_service(App::new().route("/items/{id}", web::get().to(echo))).await;
        let req = test::TestRequest::get().uri("/items/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::BadRequest as i32);
    }
}
