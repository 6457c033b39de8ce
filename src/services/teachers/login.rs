use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::TeacherService;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginIdentity, LoginRequest, LoginResponse},
};
use crate::services::{storage_error_response, validation_response};
use crate::utils::jwt::{JwtUtils, ROLE_ADMIN, ROLE_TEACHER};

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin";

// 用户名为教师的名，密码为教师的姓；admin/admin 为超级用户
pub async fn handle_login(
    service: &TeacherService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let username = login_request.username.trim();
    let password = login_request.password.trim();
    if username.is_empty() || password.is_empty() {
        return Ok(validation_response("Username and password are required"));
    }

    // 1. 超级用户
    let (teacher, subjects, role) = if username.eq_ignore_ascii_case(ADMIN_USERNAME)
        && password.eq_ignore_ascii_case(ADMIN_PASSWORD)
    {
        let identity = LoginIdentity {
            id: 0,
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            is_admin: true,
        };
        (identity, Vec::new(), ROLE_ADMIN)
    } else {
        // 2. 按名和姓匹配教师
        let teacher = match storage.find_teacher_by_name(username, password).await {
            Ok(Some(teacher)) => teacher,
            Ok(None) => {
                warn!("Login failed for username '{}'", username);
                return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                    ErrorCode::AuthFailed,
                    "Username or password is incorrect",
                )));
            }
            Err(e) => return Ok(storage_error_response("Login", e)),
        };

        // 3. 任课科目按科目分组
        let subjects = match storage.list_teacher_subject_groups(teacher.id).await {
            Ok(subjects) => subjects,
            Err(e) => return Ok(storage_error_response("Load teacher subjects", e)),
        };

        let identity = LoginIdentity {
            id: teacher.id,
            first_name: teacher.first_name,
            last_name: teacher.last_name,
            is_admin: false,
        };
        (identity, subjects, ROLE_TEACHER)
    };

    // 4. 签发访问令牌
    match JwtUtils::generate_access_token(teacher.id, role) {
        Ok((access_token, expires_in)) => {
            info!("Teacher {} logged in (role: {})", teacher.id, role);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                LoginResponse {
                    teacher,
                    subjects,
                    access_token,
                    expires_in,
                },
                "Login successful",
            )))
        }
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
