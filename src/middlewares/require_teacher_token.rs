/*!
 * 教师令牌中间件
 *
 * 保护 `/api/teachers/{id}/...` 下的教师接口：
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 令牌无效或缺失返回 401
 * 3. 令牌主体必须与路径中的教师 ID 一致，管理员不受限制，否则返回 403
 *
 * 验证通过后 Claims 存入请求扩展。
 *
 * ```rust,ignore
 * web::resource("/{id}/absences")
 *     .wrap(Condition::new(AppConfig::get().auth.require_token, RequireTeacherToken))
 *     .route(web::get().to(list_absences))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::errors::AbsenceTrackerError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::{Claims, JwtUtils};

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireTeacherToken;

fn create_error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()>::error_empty(code, message))
}

fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<Claims, AbsenceTrackerError> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            AbsenceTrackerError::authentication("Missing or invalid Authorization header")
        })?;

    JwtUtils::verify_access_token(token)
}

/// 令牌主体必须是路径中的教师，管理员除外
fn authorize_path(
    claims: &Claims,
    path_teacher_id: Option<&str>,
) -> Result<(), AbsenceTrackerError> {
    if claims.is_admin() {
        return Ok(());
    }
    match (claims.teacher_id(), path_teacher_id.and_then(|id| id.parse::<i64>().ok())) {
        (Some(token_id), Some(path_id)) if token_id == path_id => Ok(()),
        _ => Err(AbsenceTrackerError::authorization(format!(
            "Token subject {} may not access teacher {}",
            claims.sub,
            path_teacher_id.unwrap_or("?")
        ))),
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireTeacherToken
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireTeacherTokenMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireTeacherTokenMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireTeacherTokenMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireTeacherTokenMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    HttpResponse::NoContent().finish().map_into_right_body(),
                ));
            }

            let claims = match extract_and_validate_jwt(&req) {
                Ok(claims) => claims,
                Err(err) => {
                    info!("JWT authentication failed for {}: {}", req.path(), err);
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {}", err.message()),
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            if let Err(err) = authorize_path(&claims, req.match_info().get("id")) {
                warn!("{}", err);
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::TeacherTokenMismatch,
                        "Token does not belong to this teacher",
                    )
                    .map_into_right_body(),
                ));
            }

            debug!("JWT authentication successful for subject: {}", claims.sub);
            req.extensions_mut().insert(claims);
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::{ROLE_ADMIN, ROLE_TEACHER};
    use actix_web::{App, HttpRequest, test, web};

    async fn whoami(req: HttpRequest) -> HttpResponse {
        let sub = req
            .extensions()
            .get::<Claims>()
            .map(|c| c.sub.clone())
            .unwrap_or_default();
        HttpResponse::Ok().body(sub)
    }

    fn bearer(teacher_id: i64, role: &str) -> String {
        let (token, _) = JwtUtils::generate_access_token(teacher_id, role).unwrap();
        format!("Bearer {token}")
    }

    #[actix_web::test]
    async fn test_token_checks() {
        let app = test::init_service(
            App::new().service(
                web::resource("/teachers/{id}/absences")
                    .wrap(RequireTeacherToken)
                    .route(web::get().to(whoami)),
            ),
        )
        .await;

        // 缺少令牌
        let req = test::TestRequest::get()
            .uri("/teachers/7/absences")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // 令牌无效
        let req = test::TestRequest::get()
            .uri("/teachers/7/absences")
            .insert_header((AUTHORIZATION_HEADER, "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // 其他教师的令牌
        let req = test::TestRequest::get()
            .uri("/teachers/7/absences")
            .insert_header((AUTHORIZATION_HEADER, bearer(8, ROLE_TEACHER)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/teachers/7/absences")
            .insert_header((AUTHORIZATION_HEADER, bearer(7, ROLE_TEACHER)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "7");

        // 管理员可以访问任何教师
        let req = test::TestRequest::get()
            .uri("/teachers/7/absences")
            .insert_header((AUTHORIZATION_HEADER, bearer(0, ROLE_ADMIN)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_authorize_path_errors() {
        let claims = Claims {
            sub: "8".into(),
            role: ROLE_TEACHER.into(),
            exp: 0,
            iat: 0,
        };
        assert!(authorize_path(&claims, Some("8")).is_ok());
        let err = authorize_path(&claims, Some("7")).unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(authorize_path(&claims, Some("abc")).is_err());
    }
}
